//! mDNS advertisement of the relay as `_http._tcp.local.`.
//!
//! Registered once the HTTP server is bound and unregistered after it stops.
//! Request handling never touches the advertiser.

use mdns_sd::{ServiceDaemon, ServiceInfo};
use tracing::{info, warn};

/// mDNS service type for the web UI and API.
pub const HTTP_SERVICE_TYPE: &str = "_http._tcp.local.";

/// Host name clients can browse to (`printrelay.local`).
pub const HOST_NAME: &str = "printrelay.local.";

/// Errors raised while advertising.
#[derive(Debug, thiserror::Error)]
pub enum AdvertiseError {
    #[error("failed to start mDNS daemon: {0}")]
    Daemon(#[source] mdns_sd::Error),

    #[error("invalid mDNS service description: {0}")]
    ServiceInfo(#[source] mdns_sd::Error),

    #[error("failed to register mDNS service: {0}")]
    Register(#[source] mdns_sd::Error),
}

/// A live mDNS registration.
pub struct ServiceAdvertiser {
    daemon: ServiceDaemon,
    fullname: String,
}

impl ServiceAdvertiser {
    /// Register `instance_name` on `port`.
    pub fn register(instance_name: &str, port: u16) -> Result<Self, AdvertiseError> {
        let daemon = ServiceDaemon::new().map_err(AdvertiseError::Daemon)?;

        let properties = [("path", "/"), ("version", env!("CARGO_PKG_VERSION"))];

        let service_info = ServiceInfo::new(
            HTTP_SERVICE_TYPE,
            instance_name,
            HOST_NAME,
            "", // empty = auto-detect IP
            port,
            &properties[..],
        )
        .map_err(AdvertiseError::ServiceInfo)?
        .enable_addr_auto();

        let fullname = service_info.get_fullname().to_owned();
        daemon
            .register(service_info)
            .map_err(AdvertiseError::Register)?;

        info!(
            service_type = HTTP_SERVICE_TYPE,
            name = %instance_name,
            port,
            "mDNS service registered"
        );
        info!("Access via: http://{}:{}", HOST_NAME.trim_end_matches('.'), port);

        Ok(Self { daemon, fullname })
    }

    /// Unregister the service and shut down the daemon.
    pub fn shutdown(self) {
        match self.daemon.unregister(&self.fullname) {
            Ok(_) => info!(name = %self.fullname, "mDNS service unregistered"),
            Err(e) => warn!(error = %e, "failed to unregister mDNS service"),
        }
        if let Err(e) = self.daemon.shutdown() {
            warn!(error = %e, "failed to shut down mDNS daemon");
        }
    }
}
