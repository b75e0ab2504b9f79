use pricing_lens_common::ServiceConfig;
use pricing_lens_core::{
    build_histogram, export_curve_csv, export_histogram_csv, export_json, summarize_curve,
    summarize_risk, OptimizationResult, PointRequest, PointSimulation, PriceProfitPoint,
    PricingLensError, RangeRequest, RiskSummary, SimulationClient, DEFAULT_BUCKET_COUNT,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// one-shot HTTP stub: answers the first request with `status` and `body`,
/// hands back the raw request it received
async fn stub(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 { break; }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let len = text[..end].lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap()))
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len { break; }
            }
        }
        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(resp.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
        String::from_utf8_lossy(&buf).to_string()
    });
    (format!("http://{addr}"), handle)
}

fn client(base_url: String) -> SimulationClient {
    SimulationClient::new(&ServiceConfig { base_url, timeout_secs: 5 }).unwrap()
}

fn total(profits: &[f64], bins: usize) -> u64 {
    build_histogram(profits, bins).iter().map(|b| b.count).sum()
}

// --- histogram properties ---

#[test]
fn counts_sum_to_sample_size() {
    let profits: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1000) as f64 * 0.37 - 120.0).collect();
    assert_eq!(total(&profits, DEFAULT_BUCKET_COUNT), 1000);
    assert_eq!(total(&profits, 7), 1000);
    assert_eq!(total(&[-3.0, 5.5], 20), 2);
}

#[test]
fn all_equal_input_yields_one_bucket() {
    let b = build_histogram(&[42.0, 42.0, 42.0], DEFAULT_BUCKET_COUNT);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].count, 3);
}

#[test]
fn evenly_spaced_input_fills_each_bucket_once() {
    let profits: Vec<f64> = (0..20).map(|i| i as f64 * 10.0).collect();
    let b = build_histogram(&profits, 20);
    assert_eq!(b.len(), 20);
    assert!(b.iter().all(|x| x.count == 1));
    assert!(b.windows(2).all(|w| w[0].range_start < w[1].range_start));
    let labels: Vec<f64> = b.iter().map(|x| x.range_label.parse().unwrap()).collect();
    assert!(labels.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn maximum_always_in_last_bucket() {
    // 0.1 * 3 style ranges where (max - min) / width lands on or above bucket_count
    for (profits, bins) in [
        (vec![0.1, 0.2, 0.30000000000000004], 3),
        (vec![-1e-9, 1.0 / 3.0, 1.0], 20),
        (vec![1.0, 1.0 + f64::EPSILON * 4.0], 20),
        (vec![-250.75, 13.0, 999.999], 13),
    ] {
        let b = build_histogram(&profits, bins);
        assert_eq!(b.len(), bins);
        assert!(b.last().unwrap().count >= 1, "max dropped for {profits:?}");
        assert_eq!(b.iter().map(|x| x.count).sum::<u64>(), profits.len() as u64);
    }
}

#[test]
fn empty_input_yields_no_buckets() {
    assert!(build_histogram(&[], DEFAULT_BUCKET_COUNT).is_empty());
}

#[test]
fn bucket_counts_are_order_independent() {
    let profits: Vec<f64> = (0..200).map(|i| ((i as f64) * 1.618).fract() * 500.0 - 100.0).collect();
    let mut reversed = profits.clone();
    reversed.reverse();
    let mut rotated = profits.clone();
    rotated.rotate_left(77);
    let counts = |p: &[f64]| build_histogram(p, 20).iter().map(|b| b.count).collect::<Vec<_>>();
    assert_eq!(counts(&profits), counts(&reversed));
    assert_eq!(counts(&profits), counts(&rotated));
}

// --- curve ---

#[test]
fn curve_summary_passes_through() {
    let result: OptimizationResult = serde_json::from_str(
        r#"{"curve":[{"price":1,"profit":-40},{"price":10,"profit":20},{"price":20,"profit":5}],"optimal_price":10,"max_profit":20}"#,
    ).unwrap();
    let s = summarize_curve(&result).unwrap();
    assert_eq!(s.curve, &[
        PriceProfitPoint { price: 1.0, profit: -40.0 },
        PriceProfitPoint { price: 10.0, profit: 20.0 },
        PriceProfitPoint { price: 20.0, profit: 5.0 },
    ]);
    assert_eq!(s.optimal_price, 10.0);
    assert_eq!(s.max_profit, 20.0);
    assert!(s.mismatch.is_none());
}

// --- client ---

#[tokio::test]
async fn transport_error_surfaces_detail() {
    let (url, server) = stub("422 Unprocessable Entity", r#"{"detail":"min_price must be less than max_price"}"#).await;
    let err = client(url).simulate_range(&RangeRequest::default()).await.unwrap_err();
    assert!(matches!(err, PricingLensError::Transport { status: 422, .. }));
    assert!(err.to_string().contains("min_price must be less than max_price"));
    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /simulate-range "));
    assert!(raw.contains("\"min_price\":1.0"));
}

#[tokio::test]
async fn transport_error_without_detail_falls_back() {
    let (url, server) = stub("500 Internal Server Error", r#"{"oops":true}"#).await;
    let err = client(url).simulate_range(&RangeRequest::default()).await.unwrap_err();
    assert!(err.to_string().contains("Request failed"));
    server.await.unwrap();
}

#[tokio::test]
async fn range_response_decodes() {
    let (url, server) = stub("200 OK", r#"{"curve":[{"price":1.0,"profit":-40.0},{"price":3.0,"profit":12.5}],"optimal_price":3.0,"max_profit":12.5}"#).await;
    let result = client(url).simulate_range(&RangeRequest::default()).await.unwrap();
    assert_eq!(result.curve.len(), 2);
    assert_eq!(result.optimal_price, 3.0);
    server.await.unwrap();
}

#[tokio::test]
async fn monte_carlo_point_response_decodes() {
    let (url, server) = stub("200 OK", r#"{"profits":[10.0,-5.0,20.0],"mean_profit":8.33,"std_profit":10.27,"prob_loss":0.3333}"#).await;
    let sim = client(url).simulate_point(&PointRequest::default()).await.unwrap();
    let PointSimulation::MonteCarlo(summary) = sim else { panic!("expected Monte Carlo shape") };
    let view = summarize_risk(&summary, DEFAULT_BUCKET_COUNT).unwrap();
    assert_eq!(view.runs, 3);
    server.await.unwrap();
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let (url, server) = stub("200 OK", "not json").await;
    let err = client(url).simulate_range(&RangeRequest::default()).await.unwrap_err();
    assert!(matches!(err, PricingLensError::MalformedPayload(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_request_never_dispatched() {
    // nothing listens on the discard port; validation must fail first
    let c = client("http://127.0.0.1:9".into());
    let req = RangeRequest { min_price: 60.0, ..RangeRequest::default() };
    let err = c.simulate_range(&req).await.unwrap_err();
    assert!(matches!(err, PricingLensError::InvalidRequest { field: "min_price", .. }));
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    // bind then release a port so the connection is refused
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(format!("http://{addr}"));
    let err = c.simulate_range(&RangeRequest::default()).await.unwrap_err();
    assert!(matches!(err, PricingLensError::Network(_)), "got {err:?}");
}

// --- export ---

#[test]
fn export_files_written() {
    let dir = tempfile::tempdir().unwrap();
    let summary = RiskSummary { profits: vec![0.0, 5.0, 10.0], mean_profit: 5.0, std_profit: 4.08, prob_loss: 0.0 };
    let view = summarize_risk(&summary, 2).unwrap();

    let csv_path = dir.path().join("hist.csv");
    export_histogram_csv(&csv_path, &view.histogram).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "range_label,range_start,range_end,count");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "5,5,10,2");

    let curve = [PriceProfitPoint { price: 1.0, profit: -40.0 }, PriceProfitPoint { price: 2.5, profit: 3.0 }];
    let curve_path = dir.path().join("curve.csv");
    export_curve_csv(&curve_path, &curve).unwrap();
    assert_eq!(std::fs::read_to_string(&curve_path).unwrap(), "price,profit\n1,-40\n2.5,3\n");

    let json_path = dir.path().join("risk.json");
    export_json(&json_path, &view).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(doc["runs"], 3);
    assert_eq!(doc["histogram"].as_array().unwrap().len(), 2);
}
