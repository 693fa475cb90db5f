use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

/// Хранилище токена доступа. Токеном владеет внешняя оболочка: страница
/// логина его кладёт, глобальный обработчик 401 очищает. Клиент только
/// читает.
pub trait SessionStore: Send + Sync {
    /// Текущий bearer-токен, если пользователь авторизован.
    fn access_token(&self) -> Option<String>;
}

/// Реализация в памяти - для встраивающего приложения и тестов.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap() = None;
    }
}

impl SessionStore for MemorySessionStore {
    fn access_token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }
}

/// Широковещательный сигнал «сессия недействительна».
///
/// Ядро только публикует событие при ответе 401 и никогда само его не
/// обрабатывает: подписан единственный глобальный обработчик (повторная
/// аутентификация либо редирект на логин).
#[derive(Clone)]
pub struct UnauthorizedSignal {
    tx: broadcast::Sender<()>,
}

impl UnauthorizedSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    /// Поднять сигнал. Отсутствие подписчика не ошибка, но подозрительно.
    pub fn raise(&self) {
        if self.tx.send(()).is_err() {
            warn!("Unauthorized signal raised with no active handler");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for UnauthorizedSignal {
    fn default() -> Self {
        Self::new()
    }
}
