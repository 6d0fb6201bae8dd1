use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use oft_models::ToolResponse;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum OftServerError {
    #[snafu(display("Bad request: {}", message))]
    BadRequest { message: String },

    #[snafu(display("Unsupported media type: {}", message))]
    UnsupportedMediaType { message: String },
}

impl From<JsonRejection> for OftServerError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => OftServerError::UnsupportedMediaType {
                message: rejection.body_text(),
            },
            _ => OftServerError::BadRequest {
                message: rejection.body_text(),
            },
        }
    }
}

impl IntoResponse for OftServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            OftServerError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            OftServerError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        };

        let body = Json(ToolResponse::<()>::failure(self.to_string()));

        (status, body).into_response()
    }
}
