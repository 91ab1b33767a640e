//! Reading user-selected files from `<input type="file">`.

/// A file picked by the user, fully read into memory.
#[derive(Clone, Debug)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read the first file selected in `input`, if any.
#[cfg(feature = "hydrate")]
pub async fn read_first(input: &web_sys::HtmlInputElement) -> Option<PickedFile> {
    let file = input.files()?.get(0)?;
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await.ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Some(PickedFile { name: file.name(), bytes })
}
