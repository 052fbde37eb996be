mod teardown_service_impl;

pub use teardown_service_impl::TeardownServiceImpl;
