use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rstest::rstest;

use super::*;
use crate::transport::MockSoapTransport;

const DESCRIPTOR: &str = "http://ws.example.test/gasto|<soap:Envelope/>|http://www.mef.gob.pe/ObtenerDataGastoPIP";

fn unit() -> ExecutionUnit {
    ExecutionUnit::new("001234", 2026, DESCRIPTOR)
}

fn response(item_count: usize) -> String {
    let items: String = (1..=item_count)
        .map(|m| format!("<Item><AnoEje>2026</AnoEje><MesEje>{m}</MesEje><SecEjec>001234</SecEjec></Item>"))
        .collect();
    format!(
        "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>\
         <ObtenerDataGastoPIPResponse><DataGasto>{items}</DataGasto></ObtenerDataGastoPIPResponse>\
         </soap:Body></soap:Envelope>"
    )
}

fn failure() -> TransportError {
    TransportError::Request("connection reset".to_string())
}

#[rstest]
#[case(0, 1)]
#[case(2, 3)]
#[case(3, 4)]
#[tokio::test]
async fn test_every_attempt_failing_exhausts_after_max_retries_plus_one(
    #[case] max_retries: u32,
    #[case] expected_calls: u32,
) {
    let mut transport = MockSoapTransport::new();
    transport
        .expect_call()
        .times(expected_calls as usize)
        .returning(|_| Err(failure()));

    let outcome = RemoteFetcher::new(transport, max_retries).fetch_items(&unit()).await;

    match outcome {
        FetchOutcome::Exhausted { attempts, last_error } => {
            assert_eq!(attempts, expected_calls);
            assert!(last_error.contains("connection reset"));
        }
        FetchOutcome::Fetched { .. } => panic!("expected exhaustion"),
    }
}

#[tokio::test]
async fn test_first_success_stops_retrying() {
    let mut transport = MockSoapTransport::new();
    transport
        .expect_call()
        .times(1)
        .returning(|_| Ok(response(2)));

    let outcome = RemoteFetcher::new(transport, 3).fetch_items(&unit()).await;

    assert_eq!(outcome.attempts(), 1);
    assert_eq!(outcome.into_items().len(), 2);
}

#[tokio::test]
async fn test_success_on_third_attempt_returns_only_that_attempts_items() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let mut transport = MockSoapTransport::new();
    transport.expect_call().times(3).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(failure())
        } else {
            Ok(response(5))
        }
    });

    let outcome = RemoteFetcher::new(transport, 2).fetch_items(&unit()).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match outcome {
        FetchOutcome::Fetched { items, attempts } => {
            assert_eq!(attempts, 3);
            assert_eq!(items.len(), 5);
            let months: Vec<i32> = items.iter().map(|i| i.month).collect();
            assert_eq!(months, vec![1, 2, 3, 4, 5]);
        }
        FetchOutcome::Exhausted { .. } => panic!("expected items"),
    }
}

#[tokio::test]
async fn test_empty_success_is_not_retried() {
    let mut transport = MockSoapTransport::new();
    transport
        .expect_call()
        .times(1)
        .returning(|_| Ok(response(0)));

    let outcome = RemoteFetcher::new(transport, 3).fetch_items(&unit()).await;

    assert!(matches!(outcome, FetchOutcome::Fetched { ref items, attempts: 1 } if items.is_empty()));
}

#[tokio::test]
async fn test_malformed_descriptor_makes_no_call() {
    let mut transport = MockSoapTransport::new();
    transport.expect_call().never();

    let unit = ExecutionUnit::new("001234", 2026, "no-separators-here");
    let outcome = RemoteFetcher::new(transport, 3).fetch_items(&unit).await;

    assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 0, .. }));
}

#[tokio::test]
async fn test_soap_fault_counts_as_failed_attempt() {
    let fault = "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>\
                 <soap:Fault><faultstring>Service unavailable</faultstring></soap:Fault>\
                 </soap:Body></soap:Envelope>";

    let mut transport = MockSoapTransport::new();
    transport
        .expect_call()
        .times(2)
        .returning(move |_| Ok(fault.to_string()));

    let outcome = RemoteFetcher::new(transport, 1).fetch_items(&unit()).await;

    match outcome {
        FetchOutcome::Exhausted { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("Service unavailable"));
        }
        FetchOutcome::Fetched { .. } => panic!("a fault is not a success"),
    }
}

#[tokio::test]
async fn test_descriptor_parts_reach_the_transport() {
    let mut transport = MockSoapTransport::new();
    transport
        .expect_call()
        .withf(|service| {
            service.endpoint == "http://ws.example.test/gasto"
                && service.payload == "<soap:Envelope/>"
                && service.soap_action == "http://www.mef.gob.pe/ObtenerDataGastoPIP"
        })
        .times(1)
        .returning(|_| Ok(response(1)));

    let outcome = RemoteFetcher::new(transport, 0).fetch_items(&unit()).await;

    assert_eq!(outcome.into_items().len(), 1);
}

#[test]
fn test_max_attempts_saturates() {
    let fetcher = RemoteFetcher::new(MockSoapTransport::new(), u32::MAX);
    assert_eq!(fetcher.max_attempts(), u32::MAX);
}
