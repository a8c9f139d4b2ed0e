//! Utilidades de validación
//!
//! Validadores que los atributos `range` del derive no cubren: textos en
//! blanco y coordenadas no finitas (NaN pasa cualquier comparación de rango).

use std::borrow::Cow;

use validator::ValidationError;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("Vehicle type is required"));
        return Err(error);
    }
    Ok(())
}

pub fn validate_finite<I>(values: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = f64>,
{
    if values.into_iter().all(f64::is_finite) {
        return Ok(());
    }

    let mut error = ValidationError::new("finite");
    error.message = Some(Cow::Borrowed("Coordinates must be finite numbers"));
    Err(error)
}
