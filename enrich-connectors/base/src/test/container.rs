//! Runs database servers for integration tests using docker compose.
//!
//! Each infra directory holds a `docker-compose.yml`. Services publish their
//! ports on localhost so tests connect to `127.0.0.1:<port>`.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream},
    path::PathBuf,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use enrich_logging::{info, warn};

#[macro_export]
macro_rules! current_dir {
    () => {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .parent()
            .unwrap()
            .join(file!())
            .parent()
            .unwrap()
            .to_owned()
    };
}

#[derive(Debug)]
pub struct ContainerInstances {
    project_name: String,
    instances: HashMap<String, Instance>,
    infra_path: PathBuf,
    stop_on_drop: bool,
}

impl ContainerInstances {
    pub fn get(&self, service: impl Into<String>) -> Option<&Instance> {
        self.instances.get(&service.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub ip: IpAddr,
    pub port: u16,
}

impl Drop for ContainerInstances {
    fn drop(&mut self) {
        if self.stop_on_drop {
            let _ = compose(&self.project_name, self.infra_path.clone(), &["down", "-v"]);
        }
    }
}

/// Starts the containers described by {infra_path}/docker-compose.yml and
/// waits for the published `ports` (service name to host port) to accept connections
pub fn start_containers(
    project_name: &str,
    infra_path: PathBuf,
    ports: &[(&str, u16)],
    stop_on_drop: bool,
    timeout: Duration,
) -> ContainerInstances {
    let status = compose(project_name, infra_path.clone(), &["up", "-d"]);
    if !status {
        panic!("Failed to start containers in {}", infra_path.display());
    }

    let instances = ports
        .iter()
        .map(|(service, port)| {
            let instance = Instance {
                ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: *port,
            };
            info!("Waiting for {service} service to come online");
            wait_for_port_open(instance.ip, instance.port, timeout);
            (service.to_string(), instance)
        })
        .collect();

    ContainerInstances {
        project_name: project_name.to_string(),
        instances,
        infra_path,
        stop_on_drop,
    }
}

fn compose(project_name: &str, infra_path: PathBuf, args: &[&str]) -> bool {
    Command::new("docker")
        .arg("compose")
        .args(["-p", project_name])
        .args(args)
        .current_dir(infra_path)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn wait_for_port_open(ip: IpAddr, port: u16, timeout: Duration) {
    let addr = SocketAddr::new(ip, port);
    let started = Instant::now();

    loop {
        if TcpStream::connect_timeout(&addr, Duration::from_secs(1)).is_ok() {
            return;
        }

        if started.elapsed() > timeout {
            panic!("Timed out waiting for {addr} to accept connections");
        }

        thread::sleep(Duration::from_millis(500));
    }
}

/// Retries `cb` until it succeeds, used while a server finishes booting
/// after its port opens
pub fn retry<T, E: std::fmt::Display>(timeout: Duration, mut cb: impl FnMut() -> Result<T, E>) -> T {
    let started = Instant::now();

    loop {
        match cb() {
            Ok(res) => return res,
            Err(err) if started.elapsed() < timeout => {
                warn!("Retrying: {}", err);
                thread::sleep(Duration::from_secs(1));
            }
            Err(err) => panic!("Gave up after {:?}: {}", timeout, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn test_wait_for_port_open_listening() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        wait_for_port_open(IpAddr::V4(Ipv4Addr::LOCALHOST), port, Duration::from_secs(5));
    }

    #[test]
    fn test_retry_until_success() {
        let mut attempts = 0;
        let res = retry(Duration::from_secs(10), || {
            attempts += 1;
            if attempts < 2 {
                Err("not yet")
            } else {
                Ok(attempts)
            }
        });

        assert_eq!(res, 2);
    }

    #[test]
    #[should_panic(expected = "Gave up")]
    fn test_retry_gives_up() {
        retry::<(), _>(Duration::ZERO, || Err("never"));
    }
}
