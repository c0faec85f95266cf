use thiserror::Error;

use crate::color::ColorError;
use crate::shader::ShaderError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("invalid color: {0}")]
    Color(#[from] ColorError),
    #[error("nucleus background: {0}")]
    Shader(#[from] ShaderError),
}

#[cfg(target_arch = "wasm32")]
impl From<FxError> for wasm_bindgen::JsValue {
    fn from(err: FxError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_part() {
        let err: FxError = ColorError::Length(4).into();
        assert_eq!(err.to_string(), "invalid color: expected 3 or 6 hex digits, got 4");

        let err: FxError = ShaderError::Link("missing main".into()).into();
        assert_eq!(err.to_string(), "nucleus background: program failed to link: missing main");
    }
}
