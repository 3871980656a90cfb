//! Print the OpenAPI document as JSON.

use utoipa::OpenApi;
use wedding_backend::ApiDoc;

fn main() -> Result<(), serde_json::Error> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
