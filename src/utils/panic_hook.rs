use leptos::logging::log;
use std::panic;

/// Chains onto the existing hook and flags panics caused by signals being
/// touched after the testimonials view was unmounted.
pub fn set_custom_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        original_hook(panic_info);

        let message = if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        };

        if is_disposal_panic(&message) {
            log!("[PANIC] A review stream or submission outlived the testimonials view");
        }
    }));
}

fn is_disposal_panic(message: &str) -> bool {
    message.contains("OwnerDisposed") || message.contains("disposed")
}

/// Call once from the client entry point.
pub fn init() {
    console_error_panic_hook::set_once();
    set_custom_panic_hook();
    log!("[PANIC_HOOK] Custom panic hook set up successfully");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposal_messages_are_recognized() {
        assert!(is_disposal_panic("tried to access a signal that was disposed"));
        assert!(is_disposal_panic("OwnerDisposed(NodeId(3))"));
        assert!(!is_disposal_panic("index out of bounds"));
    }
}
