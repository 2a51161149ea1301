// Server module - Pingora HTTP server setup and configuration

use crate::config::Config;
use crate::proxy::UtsushiService;
use pingora::server::configuration::Opt as ServerOpt;
use pingora::server::Server;

/// Process-level switches taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerArgs {
    /// Run in the background
    pub daemon: bool,
    /// Validate configuration and exit
    pub test: bool,
    /// Take over listening sockets from a running instance
    pub upgrade: bool,
}

/// Utsushi HTTP Server wrapper around Pingora
pub struct UtsushiServer {
    listen_addr: String,
    threads: usize,
    server_opt: ServerOpt,
}

impl UtsushiServer {
    /// Create server settings from application Config and CLI switches
    pub fn from_config(config: &Config, args: ServerArgs) -> Self {
        let mut server_opt = ServerOpt::default();
        server_opt.daemon = args.daemon;
        server_opt.test = args.test;
        server_opt.upgrade = args.upgrade;
        server_opt.nocapture = false;
        server_opt.conf = None;

        Self {
            listen_addr: config.server.listen_addr(),
            threads: config.server.threads,
            server_opt,
        }
    }

    /// Socket address the service listens on
    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Worker threads for the HTTP service
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Get the Pingora server options
    pub fn server_opt(&self) -> &ServerOpt {
        &self.server_opt
    }

    /// Start serving. Blocks until shutdown.
    #[allow(unreachable_code)]
    pub fn run(self, service: UtsushiService) -> pingora_core::Result<()> {
        let mut server = Server::new(Some(self.server_opt))?;
        server.bootstrap();

        let mut http_service = pingora_proxy::http_proxy_service(&server.configuration, service);
        http_service.threads = Some(self.threads);
        http_service.add_tcp(&self.listen_addr);

        tracing::info!(
            address = %self.listen_addr,
            threads = self.threads,
            "Starting Utsushi signed URL service"
        );

        server.add_service(http_service);
        server.run_forever();
        Ok(())
    }
}
