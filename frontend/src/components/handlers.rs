use crate::api::{self, ApiError};
use crate::{Model, Msg};
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Interval;
use plant_shared::{ANALYSIS_FAILED_MESSAGE, ViewSnapshot, ViewState};
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

use super::utils::first_image_file;

const STATE_POLL_INTERVAL_MS: u32 = 2000;

pub fn handle_file_selected(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    if !model.can_upload() {
        log::info!("Model not ready, ignoring {}", file.name());
        return false;
    }

    model.request_seq += 1;
    let request_id = model.request_seq;

    model.preview = Some(ObjectUrl::from(file.clone()));
    model.loading = true;
    model.request_error = None;
    model.snapshot.state = ViewState::Loading;

    send_analysis_request(ctx, request_id, file);
    true
}

fn send_analysis_request(ctx: &Context<Model>, request_id: u64, file: GlooFile) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::analyze_image(&file).await {
            Ok(snapshot) => link.send_message(Msg::AnalysisResult(request_id, snapshot)),
            Err(ApiError(message)) => link.send_message(Msg::AnalysisFailed(request_id, message)),
        }
    });
}

pub fn handle_analysis_result(model: &mut Model, request_id: u64, snapshot: ViewSnapshot) -> bool {
    if request_id != model.request_seq {
        log::debug!("Dropping result of superseded request {}", request_id);
        return false;
    }

    model.loading = false;
    model.snapshot = snapshot;
    true
}

pub fn handle_analysis_failed(model: &mut Model, request_id: u64, message: String) -> bool {
    if request_id != model.request_seq {
        return false;
    }

    log::error!("Analysis request {} failed: {}", request_id, message);
    model.loading = false;
    model.request_error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
    model.snapshot.state = ViewState::Idle;
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|dt| dt.files())
        .and_then(|files| first_image_file(&files));

    if let Some(file) = file {
        ctx.link().send_message(Msg::FileSelected(file));
    }
    true
}

pub fn request_state(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_state().await {
            Ok(snapshot) => link.send_message(Msg::StateLoaded(snapshot)),
            Err(ApiError(message)) => log::warn!("State refresh failed: {}", message),
        }
    });
}

/// Polls the backend until the model has either loaded or failed.
pub fn start_state_polling(model: &mut Model, ctx: &Context<Model>) {
    request_state(ctx);
    let link = ctx.link().clone();
    model.state_poll = Some(Interval::new(STATE_POLL_INTERVAL_MS, move || {
        link.send_message(Msg::PollState);
    }));
}

pub fn handle_state_loaded(model: &mut Model, snapshot: ViewSnapshot) -> bool {
    let settled = snapshot.model_ready || snapshot.state.error_message().is_some();
    if settled && model.state_poll.take().is_some() {
        log::info!("Model status settled, ready: {}", snapshot.model_ready);
    }

    // An in-flight upload owns the view until its response arrives.
    if model.loading || snapshot.generation < model.snapshot.generation {
        model.snapshot.model_ready = snapshot.model_ready;
        return true;
    }

    model.snapshot = snapshot;
    true
}
