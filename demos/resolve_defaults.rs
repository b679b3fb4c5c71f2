use relaydns::dns::{FallbackResolver, Name, Resolve};
use relaydns::relay::RelayDefaults;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Default relays ===");
    let start = Instant::now();
    let defaults = RelayDefaults::init().await;
    println!("relay:  {:?}", defaults.relay);
    println!("relay6: {:?}", defaults.relay6);
    println!("Time: {:?}", start.elapsed());

    // Any extra arguments are resolved the same way.
    let resolver = FallbackResolver::new();
    for host in std::env::args().skip(1) {
        let start = Instant::now();
        let ip = resolver.resolve(Name::new(host.as_str())).await?;
        println!("\n{host} -> {ip} ({:?})", start.elapsed());
    }

    Ok(())
}
