pub mod runner;

pub use runner::SnippetRunner;

/// Generate all `#[wasm_bindgen]` exports for a snippet.
///
/// Generates:
/// - `thread_local!` storage for the SnippetRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (snippet_init, snippet_tick, input handlers, frame accessors)
///
/// Calls made before `snippet_init()` are logged and return zero values.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use lab_engine::*;
///
/// mod game;
/// use game::MySnippet;
///
/// lab_web::export_snippet!(MySnippet, "my-snippet");
/// ```
///
/// # Arguments
///
/// - `$snippet_type`: The snippet struct type that implements `lab_engine::Snippet`
/// - `$snippet_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_snippet {
    ($snippet_type:ty, $snippet_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SnippetRunner<$snippet_type>>> = RefCell::new(None);
        }

        fn try_with_runner<R>(f: impl FnOnce(&mut $crate::SnippetRunner<$snippet_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call snippet_init() first", $snippet_name);
                        None
                    }
                }
            })
        }

        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::SnippetRunner<$snippet_type>) -> R) -> R {
            try_with_runner(f).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn snippet_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let snippet = <$snippet_type>::new();
            let runner = $crate::SnippetRunner::new(snippet);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $snippet_name);
        }

        #[wasm_bindgen]
        pub fn snippet_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn snippet_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn snippet_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn snippet_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn snippet_drag_start(target: u32) {
            with_runner(|r| r.push_input(InputEvent::DragStart { target }));
        }

        #[wasm_bindgen]
        pub fn snippet_drag_move(target: u32, left: f32, top: f32, right: f32, bottom: f32) {
            let rect = Rect::new(left, top, right, bottom);
            with_runner(|r| r.push_input(InputEvent::DragMove { target, rect }));
        }

        #[wasm_bindgen]
        pub fn snippet_drag_end(target: u32) {
            with_runner(|r| r.push_input(InputEvent::DragEnd { target }));
        }

        #[wasm_bindgen]
        pub fn snippet_slider_drag(offset: f32) {
            with_runner(|r| r.push_input(InputEvent::SliderDrag { offset }));
        }

        #[wasm_bindgen]
        pub fn snippet_slider_release() {
            with_runner(|r| r.push_input(InputEvent::SliderRelease));
        }

        #[wasm_bindgen]
        pub fn snippet_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        /// On success the frame buffer may have moved; re-read the pointer and offsets.
        #[wasm_bindgen]
        pub fn snippet_load_manifest(json: &str) -> bool {
            with_runner(|r| r.load_manifest(json))
        }

        // ---- Frame accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            try_with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
        }

        /// Copy of the packed frame, for hosts that cannot read wasm memory directly.
        #[wasm_bindgen]
        pub fn get_frame() -> js_sys::Float32Array {
            try_with_runner(|r| js_sys::Float32Array::from(r.buffer()))
                .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        // ---- Layout accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        #[wasm_bindgen]
        pub fn get_tile_data_offset() -> u32 {
            with_runner(|r| r.tile_data_offset())
        }

        #[wasm_bindgen]
        pub fn get_reel_data_offset() -> u32 {
            with_runner(|r| r.reel_data_offset())
        }

        #[wasm_bindgen]
        pub fn get_event_data_offset() -> u32 {
            with_runner(|r| r.event_data_offset())
        }
    };
}
