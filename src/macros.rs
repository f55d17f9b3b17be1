//! Small crate-wide convenience macros.

/// Log a formatted line to the browser console.
///
/// Only `wasm32` debug builds emit anything; other targets still type-check
/// the arguments so call sites stay honest.
///
/// ```rust,ignore
/// debug_log!("run {} heading to {}", run.id, run.goal);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(all(target_arch = "wasm32", debug_assertions))]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
        #[cfg(not(all(target_arch = "wasm32", debug_assertions)))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
