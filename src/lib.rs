pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod coin;
    pub mod entropy;
    pub mod token;
}

pub mod models {
    pub mod session;
}

pub mod repositories {
    pub mod memory;
    pub mod session;
}

pub mod services {
    pub mod sessions;
}

pub mod handlers {
    pub mod sessions;
}

pub mod validation {
    pub mod session;
}
