//! Relay Defaults Tests
//!
//! Covers:
//! - `initialize_defaults` formatting with scripted resolvers
//! - End-to-end fallback through `ServerResolver` against a local UDP DNS responder

use relaydns::base::error::{DnsError, FailureReason};
use relaydns::dns::{
    FallbackResolver, IpPreference, LookupConfig, Name, Resolve, ResolveVia, Resolving, Roster,
    ServerResolver,
};
use relaydns::relay::{initialize_defaults, RelayDefaults, RelaySettings, TCP_BUFFER_SIZE};

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Answers from a fixed table; unknown hosts fail.
struct TableResolver {
    table: HashMap<&'static str, IpAddr>,
}

impl Resolve for TableResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let found = self.table.get(name.as_str()).copied();
        Box::pin(async move {
            found.ok_or_else(|| DnsError::AllServersFailed {
                host: name.as_str().to_string(),
            })
        })
    }
}

struct LocalFails;

impl Resolve for LocalFails {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move { Err(DnsError::local(name.as_str(), FailureReason::Timeout)) })
    }
}

/// Answers with a loopback or public address depending on the requested family.
struct PreferenceProbe;

impl Resolve for PreferenceProbe {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            Ok(match name.preference() {
                IpPreference::Ipv4 => IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)),
                IpPreference::Ipv6 => IpAddr::V6(Ipv6Addr::LOCALHOST),
            })
        })
    }
}

fn settings() -> RelaySettings {
    RelaySettings::new()
        .relay_host("relay.example.com")
        .relay6_host("relay6.example.com")
        .port(9009)
}

/// Minimal DNS responder: A queries get `v4`, AAAA queries get `v6`,
/// anything else an empty NOERROR answer.
async fn spawn_responder(v4: Ipv4Addr, v6: Ipv6Addr) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
            if let Some(reply) = answer(&buf[..len], v4, v6) {
                let _ = socket.send_to(&reply, peer).await;
            }
        }
    });
    addr
}

fn answer(query: &[u8], v4: Ipv4Addr, v6: Ipv6Addr) -> Option<Vec<u8>> {
    let mut pos = 12;
    while *query.get(pos)? != 0 {
        pos += 1 + query[pos] as usize;
    }
    pos += 1;
    let qtype = u16::from_be_bytes([*query.get(pos)?, *query.get(pos + 1)?]);
    pos += 4;

    let rdata = match qtype {
        1 => v4.octets().to_vec(),
        28 => v6.octets().to_vec(),
        _ => Vec::new(),
    };
    let ancount = u16::from(!rdata.is_empty());

    // Header and question, echoed back.
    let mut reply = query.get(..pos)?.to_vec();
    reply[2] = 0x81; // QR, RD
    reply[3] = 0x80; // RA, NOERROR
    reply[6..8].copy_from_slice(&ancount.to_be_bytes());
    reply[8..12].fill(0);

    if ancount == 1 {
        reply.extend_from_slice(&[0xC0, 0x0C]);
        reply.extend_from_slice(&qtype.to_be_bytes());
        reply.extend_from_slice(&1u16.to_be_bytes());
        reply.extend_from_slice(&60u32.to_be_bytes());
        reply.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        reply.extend_from_slice(&rdata);
    }
    Some(reply)
}

#[tokio::test]
async fn test_defaults_from_resolved_hosts() {
    let resolver = TableResolver {
        table: HashMap::from([
            ("relay.example.com", IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8))),
            ("relay6.example.com", "2001:db8::7".parse().unwrap()),
        ]),
    };

    let defaults = initialize_defaults(&resolver, &settings()).await;

    assert_eq!(defaults.relay, "5.6.7.8:9009");
    assert_eq!(defaults.relay6, "[2001:db8::7]:9009");
    assert_eq!(defaults.port, 9009);
    assert_eq!(defaults.passphrase, "pass123");
    assert!(defaults.has_relay());
    assert!(defaults.has_relay6());
}

#[tokio::test]
async fn test_unresolved_hosts_yield_empty_defaults() {
    let resolver = TableResolver {
        table: HashMap::from([("relay.example.com", IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)))]),
    };

    let defaults = initialize_defaults(&resolver, &settings()).await;

    assert_eq!(defaults.relay, "5.6.7.8:9009");
    assert_eq!(defaults.relay6, "");
    assert!(!defaults.has_relay6());

    let nothing = TableResolver {
        table: HashMap::new(),
    };
    let defaults = initialize_defaults(&nothing, &settings()).await;
    assert_eq!(
        defaults,
        RelayDefaults {
            relay: String::new(),
            relay6: String::new(),
            port: 9009,
            passphrase: "pass123".into(),
        }
    );
}

#[tokio::test]
async fn test_relay6_is_resolved_preferring_ipv6() {
    let defaults = initialize_defaults(&PreferenceProbe, &settings()).await;
    assert_eq!(defaults.relay, "5.6.7.8:9009");
    assert_eq!(defaults.relay6, "[::1]:9009");
}

#[test]
fn test_buffer_size() {
    assert_eq!(TCP_BUFFER_SIZE, 65536);
}

#[tokio::test]
async fn test_server_resolver_against_local_responder() {
    let v4 = Ipv4Addr::new(5, 6, 7, 8);
    let v6 = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x42);
    let server = spawn_responder(v4, v6).await;
    let resolver = ServerResolver::new();

    let ip = resolver
        .resolve_via(Name::new("relay.example.com"), server)
        .await
        .unwrap();
    assert_eq!(ip, IpAddr::V4(v4));

    let ip = resolver
        .resolve_via(
            Name::new("relay6.example.com").prefer(IpPreference::Ipv6),
            server,
        )
        .await
        .unwrap();
    assert_eq!(ip, IpAddr::V6(v6));
}

#[tokio::test]
async fn test_end_to_end_fallback_defaults() {
    let v4 = Ipv4Addr::new(5, 6, 7, 8);
    let v6 = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x42);

    // One server that never answers, one that does.
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let responder = spawn_responder(v4, v6).await;
    let roster: Roster = [silent.local_addr().unwrap(), responder].into_iter().collect();

    let resolver = FallbackResolver::with_resolvers(
        Arc::new(LocalFails),
        Arc::new(ServerResolver::new()),
        LookupConfig::new().roster(roster),
    );

    let started = std::time::Instant::now();
    let defaults = initialize_defaults(&resolver, &settings()).await;

    assert_eq!(defaults.relay, "5.6.7.8:9009");
    assert_eq!(defaults.relay6, "[2001:db8::42]:9009");
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_end_to_end_total_failure_is_not_fatal() {
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let roster: Roster = [silent.local_addr().unwrap()].into_iter().collect();

    let resolver = FallbackResolver::with_resolvers(
        Arc::new(LocalFails),
        Arc::new(ServerResolver::with_timeout(Duration::from_millis(200))),
        LookupConfig::new()
            .timeout(Duration::from_millis(200))
            .roster(roster),
    );

    let defaults = initialize_defaults(&resolver, &settings()).await;
    assert_eq!(defaults.relay, "");
    assert_eq!(defaults.relay6, "");
    assert_eq!(defaults.port, 9009);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_undialable_server_fails_fast() {
    // The kernel refuses to connect a UDP socket to the broadcast address.
    let broadcast: SocketAddr = "255.255.255.255:53".parse().unwrap();
    let roster: Roster = [broadcast].into_iter().collect();
    let resolver = FallbackResolver::with_resolvers(
        Arc::new(LocalFails),
        Arc::new(ServerResolver::new()),
        LookupConfig::new().roster(roster),
    );

    let started = std::time::Instant::now();
    let err = resolver
        .resolve(Name::new("relay.example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.host(), "relay.example.com");
    assert!(started.elapsed() < Duration::from_millis(500));

    let direct = ServerResolver::new()
        .resolve_via(Name::new("relay.example.com"), broadcast)
        .await
        .unwrap_err();
    assert!(matches!(
        direct.reason(),
        Some(FailureReason::Unreachable(_))
    ));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_undialable_server_does_not_block_race() {
    let v4 = Ipv4Addr::new(5, 6, 7, 8);
    let v6 = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x42);
    let responder = spawn_responder(v4, v6).await;
    let broadcast: SocketAddr = "255.255.255.255:53".parse().unwrap();
    let roster: Roster = [broadcast, responder].into_iter().collect();

    let resolver = FallbackResolver::with_resolvers(
        Arc::new(LocalFails),
        Arc::new(ServerResolver::new()),
        LookupConfig::new().roster(roster),
    );

    let ip = resolver.resolve(Name::new("relay.example.com")).await.unwrap();
    assert_eq!(ip, IpAddr::V4(v4));
}
