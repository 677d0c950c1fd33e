pub mod google_oauth;
pub mod keyring_service;
