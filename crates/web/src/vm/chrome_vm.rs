use tracker_core::model::UserAccount;

use crate::flash::Flash;

/// Navigation state for the signed-in account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavVm {
    pub display_name: String,
    pub is_admin: bool,
}

impl From<&UserAccount> for NavVm {
    fn from(user: &UserAccount) -> Self {
        Self {
            display_name: user.display_name().to_owned(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashVm {
    pub class: String,
    pub message: String,
}

impl From<Flash> for FlashVm {
    fn from(flash: Flash) -> Self {
        Self {
            class: format!("flash flash-{}", flash.level.as_str()),
            message: flash.message,
        }
    }
}

/// Everything the page frame needs besides the body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChromeVm {
    pub nav: Option<NavVm>,
    pub flashes: Vec<FlashVm>,
}

impl ChromeVm {
    #[must_use]
    pub fn new(user: Option<&UserAccount>, flashes: Vec<Flash>) -> Self {
        Self {
            nav: user.map(NavVm::from),
            flashes: flashes.into_iter().map(FlashVm::from).collect(),
        }
    }
}
