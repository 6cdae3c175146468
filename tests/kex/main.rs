#[allow(dead_code)]
mod server;

mod dh_test;
mod ecdh_test;
mod gex_test;
mod rsa_test;
mod session_test;
