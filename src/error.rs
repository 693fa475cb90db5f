use thiserror::Error;

/// Ошибки клиента бронирования.
///
/// `Unauthenticated` никогда не показывается на месте: ответ 401 уходит
/// глобальному обработчику сессии через `UnauthorizedSignal`, а вызвавший
/// компонент просто прекращает свою операцию.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Нет действующего токена, либо сервер ответил 401.
    #[error("not authenticated")]
    Unauthenticated,

    /// Контекст бронирования отсутствует или неполный. Пользователя
    /// возвращают к выбору мест.
    #[error("invalid booking context: {0}")]
    Validation(String),

    /// Сервер не смог создать заказ (например, не вернул paymentUrl).
    /// Повторить может только сам пользователь.
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),

    /// Оплату не удалось подтвердить ни основным, ни резервным путём.
    #[error("payment verification failed, check your tickets to confirm")]
    VerificationFailed,

    /// Заказ не найден среди заказов пользователя.
    #[error("order not found")]
    NotFound,

    /// Не удалось сформировать документ билета. Показ билета на экране
    /// при этом не меняется.
    #[error("ticket export failed: {0}")]
    ExportFailed(String),

    /// Транспортная ошибка HTTP-клиента.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Ответ API с кодом ошибки (кроме 401).
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
}
