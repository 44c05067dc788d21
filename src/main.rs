mod components;
mod config;
mod error;
mod gateway;
mod model;
mod render;
mod state;
mod util;

use components::app::App;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        // tracing events reach the console through its `log` bridge
        wasm_logger::init(wasm_logger::Config::default());
    }
    yew::Renderer::<App>::new().render();
}
