//! # Navigator 模块
//!
//! 遮罩与预加载都结束后执行路由跳转。不重试。

use std::rc::Rc;

use serde::Serialize;
use tracing::info;

use crate::host::Router;
use crate::state::ControllerState;

/// 一次导航请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    /// 目标路径名
    pub target_path: String,
    /// 乱码文字效果的目标文字（未启用时为 `None`）
    pub display_text: Option<String>,
}

impl NavigationRequest {
    pub fn new(target_path: impl Into<String>, display_text: Option<String>) -> Self {
        Self {
            target_path: target_path.into(),
            display_text,
        }
    }
}

/// 导航器
pub struct Navigator {
    router: Rc<dyn Router>,
}

impl Navigator {
    pub fn new(router: Rc<dyn Router>) -> Self {
        Self { router }
    }

    pub fn current_path(&self) -> String {
        self.router.pathname()
    }

    /// 推送路由，然后提交显示文字
    pub fn navigate(&self, request: &NavigationRequest, state: &ControllerState) {
        info!(path = %request.target_path, "导航");
        self.router.push(&request.target_path);
        state.commit_display_text(request.display_text.clone());
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator").finish_non_exhaustive()
    }
}
