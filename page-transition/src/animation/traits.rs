//! # Traits 模块
//!
//! 可动画对象接口。时间轴只操作 f32 属性，不关心对象是什么：
//! 遮罩面板、logo 图层、签名路径、过渡文字都通过这个接口被驱动。

/// 可动画对象接口
///
/// 使用内部可变性（`Cell` / `RefCell`），时间轴只持有 `Rc<dyn Animatable>`。
pub trait Animatable: 'static {
    /// 获取属性的当前值
    ///
    /// # 返回
    /// - `Some(value)`: 属性存在
    /// - `None`: 属性不存在
    fn get_property(&self, property_id: &str) -> Option<f32>;

    /// 设置属性的新值
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 属性不存在
    fn set_property(&self, property_id: &str, value: f32) -> bool;

    /// 所有可动画属性的列表
    ///
    /// 空列表表示“接受任意属性但什么都不做”（见 [`NullTarget`]）。
    fn property_list(&self) -> &'static [&'static str];
}

/// 空目标
///
/// 动画目标缺失时（例如页面上没有签名路径）用它顶替，
/// 所有动画步骤都变成无操作而不是报错。
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl Animatable for NullTarget {
    fn get_property(&self, _property_id: &str) -> Option<f32> {
        None
    }

    fn set_property(&self, _property_id: &str, _value: f32) -> bool {
        false
    }

    fn property_list(&self) -> &'static [&'static str] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fader {
        opacity: Cell<f32>,
    }

    impl Animatable for Fader {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            match property_id {
                "opacity" => Some(self.opacity.get()),
                _ => None,
            }
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            match property_id {
                "opacity" => {
                    self.opacity.set(value);
                    true
                }
                _ => false,
            }
        }

        fn property_list(&self) -> &'static [&'static str] {
            &["opacity"]
        }
    }

    #[test]
    fn test_animatable_trait() {
        let fader = Fader {
            opacity: Cell::new(0.0),
        };
        assert!(fader.set_property("opacity", 0.5));
        assert_eq!(fader.get_property("opacity"), Some(0.5));
        assert!(!fader.set_property("scale", 1.0));
        assert_eq!(fader.get_property("scale"), None);
    }

    #[test]
    fn test_null_target_is_noop() {
        let target = NullTarget;
        assert!(!target.set_property("stroke_dashoffset", 10.0));
        assert_eq!(target.get_property("stroke_dashoffset"), None);
        assert!(target.property_list().is_empty());
    }
}
