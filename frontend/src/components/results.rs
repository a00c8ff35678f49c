use crate::Model;
use plant_shared::ViewState;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    if model.loading {
        return render_loading();
    }

    match &model.snapshot.state {
        ViewState::Success {
            prediction,
            explanation,
        } => html! {
            <div class="results-container">
                <h2>{"Prediction"}</h2>
                <p class="prediction">
                    {"The plant appears to be affected by: "}
                    <strong>{ prediction.to_string() }</strong>
                </p>
                if let Some(text) = explanation {
                    <div class="explanation">
                        <h3>{"Detailed Analysis"}</h3>
                        <p>{ text }</p>
                    </div>
                }
            </div>
        },
        ViewState::Loading => render_loading(),
        ViewState::Idle | ViewState::Error { .. } => html! {},
    }
}

fn render_loading() -> Html {
    html! {
        <div class="loading-indicator">
            <i class="fa-solid fa-spinner fa-spin"></i>
            <p>{"Analyzing image..."}</p>
        </div>
    }
}

pub fn render_model_status(model: &Model) -> Html {
    if model.snapshot.model_ready || model.snapshot.state.error_message().is_some() {
        html! {}
    } else {
        html! {
            <p class="model-status">
                <i class="fa-solid fa-circle-notch fa-spin"></i>{" Loading model..."}
            </p>
        }
    }
}
