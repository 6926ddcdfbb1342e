pub mod runner;

pub use runner::GameRunner;

/// Expand the wasm-bindgen surface for one `Game` type.
///
/// The runner lives in a `thread_local!` slot that `game_init` or
/// `game_init_with_config` fills. Every other export borrows it through
/// `with_runner`, so calling them before init is a host bug and panics.
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use stage_engine::InputEvent;
///
/// mod stage;
/// use stage::MyStage;
///
/// stage_web::export_game!(MyStage, "my-stage");
/// ```
///
/// `$game_type` must implement `stage_engine::Game` and provide `new()`.
/// `$game_name` prefixes the bridge's log lines.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        thread_local! {
            static RUNNER: std::cell::RefCell<Option<$crate::GameRunner<$game_type>>> =
                std::cell::RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|slot| {
                let mut slot = slot.borrow_mut();
                f(slot.as_mut().expect("game_init() must run before any other export"))
            })
        }

        fn start_runner(config_json: Option<&str>) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let mut runner = $crate::GameRunner::new(<$game_type>::new());
            let accepted = match config_json.map(|json| runner.load_config(json)) {
                Some(Err(err)) => {
                    log::warn!("{}: {}; falling back to defaults", $game_name, err);
                    false
                }
                _ => true,
            };
            runner.init();
            RUNNER.with(|slot| *slot.borrow_mut() = Some(runner));

            log::info!("{}: runner ready", $game_name);
            accepted
        }

        fn push_input(event: InputEvent) {
            with_runner(|r| r.push_input(event));
        }

        #[wasm_bindgen]
        pub fn game_init() {
            start_runner(None);
        }

        /// Returns false when the JSON was rejected and defaults were used.
        #[wasm_bindgen]
        pub fn game_init_with_config(json: &str) -> bool {
            start_runner(Some(json))
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            push_input(InputEvent::PointerDown { x, y });
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            push_input(InputEvent::PointerUp { x, y });
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            push_input(InputEvent::PointerMove { x, y });
        }

        #[wasm_bindgen]
        pub fn game_pointer_leave() {
            push_input(InputEvent::PointerLeave);
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            push_input(InputEvent::Custom { kind, a, b, c });
        }

        /// Returns true when the stage size actually changed.
        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) -> bool {
            with_runner(|r| r.resize(width, height))
        }

        #[wasm_bindgen]
        pub fn game_teardown() {
            with_runner(|r| r.teardown());
        }

        $crate::runner_accessors! {
            get_instances_ptr => instances_ptr: *const f32,
            get_instance_count => instance_count: u32,
            get_game_events_ptr => game_events_ptr: *const f32,
            get_game_events_len => game_events_len: u32,
            get_world_width => world_width: f32,
            get_world_height => world_height: f32,
            get_particle_count => particle_count: u32,
            get_max_instances => max_instances: u32,
            get_max_events => max_events: u32,
        }
    };
}

/// Read-only runner getters exported to the host. Used by `export_game!`.
#[doc(hidden)]
#[macro_export]
macro_rules! runner_accessors {
    ($($export:ident => $method:ident: $ret:ty),* $(,)?) => {
        $(
            #[wasm_bindgen]
            pub fn $export() -> $ret {
                with_runner(|r| r.$method())
            }
        )*
    };
}
