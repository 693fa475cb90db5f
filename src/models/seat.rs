use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Место, выбранное пользователем на схеме зала.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedSeat {
    /// Код места вида "A12": метка ряда + номер.
    #[serde(rename = "seatCode")]
    pub seat_code: String,
    #[serde(rename = "layoutType")]
    pub layout_type: String,
}

impl SelectedSeat {
    pub fn new(seat_code: impl Into<String>, layout_type: impl Into<String>) -> Self {
        Self {
            seat_code: seat_code.into(),
            layout_type: layout_type.into(),
        }
    }
}

/// Место в том виде, в котором его хранит и принимает сервер.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatPosition {
    pub row: String,
    pub column: u32,
    #[serde(rename = "layoutType")]
    pub layout_type: String,
}

/// Разбирает код места на ряд и номер: "A12" -> ("A", 12).
///
/// Ряд - ведущие нецифровые символы, номер - цифровой хвост. Разбор
/// детерминирован и обратим: `row + column` воспроизводит исходный код.
pub fn split_seat_code(code: &str) -> Result<(String, u32), ClientError> {
    let split_at = code
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| ClientError::Validation(format!("seat code '{code}' has no number")))?;

    if split_at == 0 {
        return Err(ClientError::Validation(format!(
            "seat code '{code}' has no row label"
        )));
    }

    let (row, digits) = code.split_at(split_at);
    let column: u32 = digits.parse().map_err(|_| {
        ClientError::Validation(format!("seat code '{code}' has an invalid number"))
    })?;

    Ok((row.to_string(), column))
}
