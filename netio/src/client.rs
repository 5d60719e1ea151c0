use std::sync::LazyLock;
use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::tls::Version;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_IDLE_PER_HOST: usize = 10;

/// The process-wide HTTP(S) client shared by the direct downloader and the
/// host-helper resolver, generalizing the reference app's `DROP_CLIENT_SYNC`
/// singleton. TLS's minimum version floor is lowered to admit the legacy
/// ciphers some archive hosts still serve over; a single keep-alive pool of
/// 10 idle connections is shared across range workers.
pub static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(build_client);

fn build_client() -> Client {
    ClientBuilder::new()
        .min_tls_version(Version::TLS_1_0)
        .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("failed to build shared HTTP client")
}
