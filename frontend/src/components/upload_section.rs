use super::preview_area::render_image_frame;
use super::utils::{FILE_INPUT_ID, debounce, first_image_file, open_file_picker};
use crate::{Model, Msg};
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let onchange = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input
            .files()
            .and_then(|files| first_image_file(&files))
            .map(Msg::FileSelected)
    });

    let ondragover = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });
    let ondragleave = link.callback(|_: DragEvent| Msg::SetDragging(false));
    let ondrop = link.callback(Msg::HandleDrop);

    let drop_zone_class = classes!(
        "upload-area",
        model.is_dragging.then_some("dragging"),
        model.loading.then_some("busy")
    );

    html! {
        <section class="upload-section">
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept="image/*"
                style="display: none;"
                {onchange}
            />
            <div
                class={drop_zone_class}
                onclick={Callback::from(|_: MouseEvent| open_file_picker())}
                {ondragover}
                {ondragleave}
                {ondrop}
            >
                { render_image_frame(model) }
            </div>
            <div class="button-container">
                <button
                    class="upload-btn"
                    disabled={!model.can_upload()}
                    onclick={debounce(300, open_file_picker)}
                >
                    <i class="fa-solid fa-upload"></i>{" Upload New Image"}
                </button>
            </div>
        </section>
    }
}
