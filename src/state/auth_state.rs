// ============================================================================
// AUTH STATE - Último login recibido del padre
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::LoginPayload;

#[derive(Clone)]
pub struct AuthState {
    pub login: Rc<RefCell<Option<LoginPayload>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            login: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_login(&self, login: Option<LoginPayload>) {
        *self.login.borrow_mut() = login;
    }

    pub fn current_login(&self) -> Option<LoginPayload> {
        self.login.borrow().clone()
    }

    pub fn get_token(&self) -> Option<String> {
        self.login.borrow().as_ref().map(|l| l.token.clone())
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
