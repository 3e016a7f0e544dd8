/* demos/demo.rs */

use forwarded_ip::{IpSelector, Strategy, header_map, naive_select, secure_select};

fn main() {
    println!("=== Client IP Selection Examples ===\n");

    // Example 1: Secure mode, rightmost public hop
    example_1_secure();

    // Example 2: Naive mode, real-ip header first
    example_2_naive();

    // Example 3: Everything private, fall back to the peer
    example_3_fallback();

    // Example 4: Spoofed leftmost hop
    example_4_spoofing();

    // Example 5: Custom header names
    example_5_custom_selector();

    println!("=== All examples completed! ===");
}

fn example_1_secure() {
    println!("Example 1: Secure mode scans X-Forwarded-For right to left");

    let forwarded = ["203.0.113.1", "198.51.100.10", "10.0.0.5"];
    println!("X-Forwarded-For: {}", forwarded.join(", "));
    println!("Selected: {}", secure_select(&forwarded, "10.0.0.6:51000"));
    println!();
}

fn example_2_naive() {
    println!("Example 2: Naive mode trusts X-Real-IP first");

    let forwarded = ["203.0.113.1", "198.51.100.10"];
    println!("X-Real-IP: 192.0.2.44");
    println!("X-Forwarded-For: {}", forwarded.join(", "));
    println!("Selected: {}", naive_select("192.0.2.44", &forwarded, "10.0.0.6:51000"));
    println!("Without X-Real-IP: {}", naive_select("", &forwarded, "10.0.0.6:51000"));
    println!();
}

fn example_3_fallback() {
    println!("Example 3: All forwarded hops private");

    let forwarded = ["192.168.1.20", "100.64.3.1", "not-an-ip"];
    println!("X-Forwarded-For: {}", forwarded.join(", "));
    println!("Secure: {}", secure_select(&forwarded, "203.0.113.50:443"));
    println!("Naive:  {}", naive_select("", &forwarded, "203.0.113.50:443"));
    println!();
}

fn example_4_spoofing() {
    println!("Example 4: Client injects a fake leftmost hop");

    // The client sent "X-Forwarded-For: 8.8.8.8"; the load balancer appended the real peer.
    let headers = header_map([("X-Forwarded-For", "8.8.8.8"), ("X-Forwarded-For", "203.0.113.9")]);

    for strategy in [Strategy::Secure, Strategy::Naive] {
        let selector = IpSelector::new().with_strategy(strategy);
        println!("{strategy}: {}", selector.select(&headers, "10.0.0.2:8080"));
    }
    println!();
}

fn example_5_custom_selector() {
    println!("Example 5: Custom header names");

    let headers = header_map([
        ("CF-Connecting-IP", "198.51.100.200"),
        ("X-Forwarded-For", "203.0.113.100"),
    ]);

    let selector = IpSelector::naive().with_real_ip_header("CF-Connecting-IP");
    println!("Naive with CF-Connecting-IP: {}", selector.select(&headers, "10.0.0.2"));

    let default_selector = IpSelector::naive();
    println!("Naive with X-Real-IP: {}", default_selector.select(&headers, "10.0.0.2"));
    println!();
}
