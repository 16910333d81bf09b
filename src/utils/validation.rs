//! Utilidades de validación
//!
//! Este módulo contiene los validadores custom y las expresiones regulares
//! que usan los DTOs con `#[derive(Validate)]`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Número de camión: letras, dígitos y guiones (ej. `TR-042`)
    pub static ref EQUIPMENT_NUMBER_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-]{0,19}$").unwrap();

    /// Código de pieza: mayúsculas, dígitos, guiones y puntos (ej. `OF-100`)
    pub static ref PART_CODE_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9\-\.]{1,31}$").unwrap();
}

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// El kilometraje nunca es negativo
pub fn validate_mileage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("mileage"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_number() {
        assert!(EQUIPMENT_NUMBER_RE.is_match("TR-042"));
        assert!(EQUIPMENT_NUMBER_RE.is_match("17"));
        assert!(!EQUIPMENT_NUMBER_RE.is_match("-TR"));
        assert!(!EQUIPMENT_NUMBER_RE.is_match("TR 042"));
        assert!(!EQUIPMENT_NUMBER_RE.is_match(""));
    }

    #[test]
    fn test_part_code() {
        assert!(PART_CODE_RE.is_match("OF-100"));
        assert!(PART_CODE_RE.is_match("BRK.PAD.2"));
        assert!(!PART_CODE_RE.is_match("of-100"));
        assert!(!PART_CODE_RE.is_match("X"));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("engine").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_mileage() {
        assert!(validate_mileage(&Decimal::new(152_300, 1)).is_ok());
        assert!(validate_mileage(&Decimal::ZERO).is_ok());
        assert!(validate_mileage(&Decimal::new(-1, 0)).is_err());
    }
}
