mod api;
mod components;

use components::handlers;
use components::header::render_header;
use components::results::{render_model_status, render_results};
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Interval;
use plant_shared::ViewSnapshot;
use web_sys::DragEvent;
use yew::prelude::*;

pub enum Msg {
    // Upload
    FileSelected(GlooFile),
    HandleDrop(DragEvent),
    SetDragging(bool),

    // Backend responses, tagged with the request they answer
    AnalysisResult(u64, ViewSnapshot),
    AnalysisFailed(u64, String),

    // Model status
    PollState,
    StateLoaded(ViewSnapshot),
}

pub struct Model {
    preview: Option<ObjectUrl>,
    snapshot: ViewSnapshot,
    loading: bool,
    request_error: Option<String>,
    is_dragging: bool,
    request_seq: u64,
    state_poll: Option<Interval>,
}

impl Model {
    fn new() -> Self {
        Self {
            preview: None,
            snapshot: ViewSnapshot::default(),
            loading: false,
            request_error: None,
            is_dragging: false,
            request_seq: 0,
            state_poll: None,
        }
    }

    /// Uploads are accepted only once the backend reports a loaded model.
    pub fn can_upload(&self) -> bool {
        self.snapshot.model_ready
    }

    /// A failed request wins over whatever the last snapshot says.
    pub fn error_message(&self) -> Option<&str> {
        if self.loading {
            return None;
        }
        self.request_error
            .as_deref()
            .or_else(|| self.snapshot.state.error_message())
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self::new();
        handlers::start_state_polling(&mut model, ctx);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => handlers::handle_file_selected(self, ctx, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::SetDragging(dragging) => {
                let changed = self.is_dragging != dragging;
                self.is_dragging = dragging;
                changed
            }
            Msg::AnalysisResult(id, snapshot) => handlers::handle_analysis_result(self, id, snapshot),
            Msg::AnalysisFailed(id, message) => handlers::handle_analysis_failed(self, id, message),
            Msg::PollState => {
                handlers::request_state(ctx);
                false
            }
            Msg::StateLoaded(snapshot) => handlers::handle_state_loaded(self, snapshot),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }
                { render_model_status(self) }
                { render_upload_section(self, ctx) }
                { render_error_message(self) }
                { render_results(self) }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
