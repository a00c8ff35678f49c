use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-leaf"></i> {" Plant Disease Predictor"}</h1>
            <p class="subtitle">{"Upload a photo of a leaf to identify common diseases"}</p>
        </header>
    }
}
