//! Nail art example - applies a style to a hand photo, skipping validation.
//!
//! Run with: `cargo run --example edit_hand -- <hand.jpg> "galaxy theme"`
//!
//! Requires `OPENAI_API_KEY` environment variable.

use nailviz::{
    build_prompt, EditRequest, ImageEditor, OpenAiImageEditor, StyleDescription, UploadedImage,
};

#[tokio::main]
async fn main() -> nailviz::Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args.next().expect("Usage: edit_hand <hand.jpg> <style>");
    let style = StyleDescription::new(args.next().unwrap_or_else(|| "floral pastel".into()))?;

    let upload = UploadedImage::from_path(&input_path)?;

    let editor = OpenAiImageEditor::builder().build()?;
    let request = EditRequest::new(build_prompt(&style), upload.data)
        .with_content_type(upload.file_name, upload.content_type);

    let image = editor.edit(&request).await?;
    image.save("nail_art_result.png")?;
    println!(
        "Edited image saved to nail_art_result.png ({} bytes)",
        image.size()
    );

    Ok(())
}
