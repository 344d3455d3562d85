use std::sync::LazyLock;

use regex::Regex;

// iputils: "rtt min/avg/max/mdev = 14.1/15.4/16.7/0.3 ms"
// bsd/macos/busybox: "round-trip min/avg/max[/stddev] = 14.1/15.4/16.7[/0.3] ms"
static RTT_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:rtt|round-trip)\s+min/avg/max(?:/\w+)?\s*=\s*([\d.]+)/([\d.]+)/([\d.]+)")
        .expect("valid regex")
});

// windows: "Minimum = 14ms, Maximum = 16ms, Average = 15ms"
static WIN_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Minimum\s*=\s*(\d+)ms,\s*Maximum\s*=\s*(\d+)ms,\s*Average\s*=\s*(\d+)ms")
        .expect("valid regex")
});

static PACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+packets?\s+transmitted,\s+(\d+)\s+(?:packets\s+)?received")
        .expect("valid regex")
});

static WIN_PACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sent\s*=\s*(\d+),\s*Received\s*=\s*(\d+)").expect("valid regex"));

static REPLY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time[=<]\s*([\d.]+)\s*ms").expect("valid regex"));

/// Fields read from the text a ping utility prints.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PingOutput {
    pub transmitted: Option<u32>,
    pub received: Option<u32>,
    pub rtt_min: Option<f64>,
    pub rtt_avg: Option<f64>,
    pub rtt_max: Option<f64>,
}

impl PingOutput {
    /// Average round-trip time in milliseconds.
    #[must_use]
    pub fn rtt(&self) -> Option<f64> { self.rtt_avg.filter(|v| v.is_finite() && *v >= 0.0) }

    /// Lost packets as a percentage, when both counters are known.
    #[must_use]
    pub fn loss_percent(&self) -> Option<f64> {
        match (self.transmitted, self.received) {
            (Some(tx), Some(rx)) if tx > 0 => {
                Some(f64::from(tx.saturating_sub(rx)) * 100.0 / f64::from(tx))
            }
            _ => None,
        }
    }
}

#[must_use]
pub fn parse(text: &str) -> PingOutput {
    let mut out = PingOutput::default();

    if let Some(c) = PACKETS.captures(text).or_else(|| WIN_PACKETS.captures(text)) {
        out.transmitted = c[1].parse().ok();
        out.received = c[2].parse().ok();
    }

    if let Some(c) = RTT_SUMMARY.captures(text) {
        out.rtt_min = c[1].parse().ok();
        out.rtt_avg = c[2].parse().ok();
        out.rtt_max = c[3].parse().ok();
    } else if let Some(c) = WIN_SUMMARY.captures(text) {
        out.rtt_min = c[1].parse().ok();
        out.rtt_max = c[2].parse().ok();
        out.rtt_avg = c[3].parse().ok();
    }
    if out.rtt_avg.is_some() {
        return out;
    }

    // no summary line, fall back to the individual replies
    let replies: Vec<f64> = REPLY_TIME
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if !replies.is_empty() {
        let n = f64::from(u32::try_from(replies.len()).unwrap_or(u32::MAX));
        out.rtt_min = replies.iter().copied().reduce(f64::min);
        out.rtt_max = replies.iter().copied().reduce(f64::max);
        out.rtt_avg = Some(replies.iter().sum::<f64>() / n);
    }
    out
}

#[cfg(test)]
mod tests {
    use paste::paste;

    use super::*;

    const IPUTILS: &str = "\
PING example.com (93.184.216.34) 56(84) bytes of data.
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=14.1 ms
64 bytes from 93.184.216.34: icmp_seq=2 ttl=56 time=16.7 ms

--- example.com ping statistics ---
2 packets transmitted, 2 received, 0% packet loss, time 1001ms
rtt min/avg/max/mdev = 14.100/15.400/16.700/1.300 ms
";

    const MACOS: &str = "\
PING example.com (93.184.216.34): 56 data bytes
64 bytes from 93.184.216.34: icmp_seq=0 ttl=56 time=20.512 ms
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=22.004 ms

--- example.com ping statistics ---
2 packets transmitted, 2 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 20.512/21.258/22.004/0.746 ms
";

    const BUSYBOX: &str = "\
--- 10.0.0.1 ping statistics ---
2 packets transmitted, 2 packets received, 0% packet loss
round-trip min/avg/max = 1.021/1.500/1.979 ms
";

    const WINDOWS: &str = "\
Reply from 93.184.216.34: bytes=32 time=14ms TTL=56
Reply from 93.184.216.34: bytes=32 time=16ms TTL=56

Ping statistics for 93.184.216.34:
    Packets: Sent = 2, Received = 2, Lost = 0 (0% loss),
Approximate round trip times in milli-seconds:
    Minimum = 14ms, Maximum = 16ms, Average = 15ms
";

    // interrupted run, replies printed but no summary
    const REPLIES_ONLY: &str = "\
64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=2.00 ms
64 bytes from 10.0.0.1: icmp_seq=2 ttl=64 time<1 ms
64 bytes from 10.0.0.1: icmp_seq=3 ttl=64 time=3.00 ms
";

    const TOTAL_LOSS: &str = "\
PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.

--- 10.255.255.1 ping statistics ---
2 packets transmitted, 0 received, 100% packet loss, time 1015ms
";

    macro_rules! rtt_cases {
        ($($name:ident: $text:expr => $avg:expr, $min:expr, $max:expr;)*) => {
            $(paste! {
                #[test]
                fn [<parses_ $name>]() {
                    let out = parse($text);
                    assert_eq!(out.rtt(), Some($avg));
                    assert_eq!(out.rtt_min, Some($min));
                    assert_eq!(out.rtt_max, Some($max));
                }
            })*
        };
    }

    rtt_cases! {
        iputils: IPUTILS => 15.4, 14.1, 16.7;
        macos: MACOS => 21.258, 20.512, 22.004;
        busybox: BUSYBOX => 1.5, 1.021, 1.979;
        windows: WINDOWS => 15.0, 14.0, 16.0;
        replies_only: REPLIES_ONLY => 2.0, 1.0, 3.0;
    }

    #[test]
    fn packet_counters() {
        let out = parse(IPUTILS);
        assert_eq!((out.transmitted, out.received), (Some(2), Some(2)));
        assert_eq!(out.loss_percent(), Some(0.0));

        let out = parse(WINDOWS);
        assert_eq!((out.transmitted, out.received), (Some(2), Some(2)));
    }

    #[test]
    fn total_loss_has_no_rtt() {
        let out = parse(TOTAL_LOSS);
        assert_eq!(out.rtt(), None);
        assert_eq!(out.loss_percent(), Some(100.0));
    }

    #[test]
    fn garbage_has_nothing() {
        assert_eq!(parse("ping: unknown host nope.invalid\n"), PingOutput::default());
        assert_eq!(parse(""), PingOutput::default());
    }
}
