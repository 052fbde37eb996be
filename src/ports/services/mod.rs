mod teardown_service;

pub use teardown_service::TeardownService;
