use crate::Model;
use yew::prelude::*;

/// Shows the uploaded image, or the placeholder before the first upload.
pub fn render_image_frame(model: &Model) -> Html {
    let src = model
        .preview
        .as_ref()
        .map(|url| url.to_string())
        .or_else(|| model.snapshot.image_url.clone());

    match src {
        Some(src) => html! {
            <img id="image-preview" class="uploaded-image" src={src} alt="Uploaded plant" />
        },
        None => html! {
            <div class="upload-placeholder">
                <i class="fa-solid fa-cloud-arrow-up"></i>
                <p>{"Click to upload or drag and drop"}</p>
                <p class="file-types">{"Supported formats: JPG, PNG, WEBP"}</p>
            </div>
        },
    }
}
