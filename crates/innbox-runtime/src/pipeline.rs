//! Processing pipeline: mailbox in, booking form and notifications out.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use innbox_core::{BookingRequest, Result};
use innbox_extract::BookingExtractor;

use crate::types::{InboundRequest, ProcessReport, SubmissionResult};

/// Source of unread booking emails.
#[async_trait]
pub trait MailSource: Send + Sync {
    async fn fetch_unread(&self) -> Result<Vec<InboundRequest>>;
    async fn mark_processed(&self, uid: &str) -> Result<()>;
}

/// Drives the booking form for one record.
#[async_trait]
pub trait BookingDesk: Send + Sync {
    async fn submit(&self, booking: &BookingRequest, guest_email: &str)
        -> Result<SubmissionResult>;
}

/// Sends outcome emails back to the guest.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(
        &self,
        to: &str,
        guest_name: &str,
        booking: &BookingRequest,
        booking_id: &str,
        message: &str,
    ) -> Result<()>;

    async fn send_failure(&self, to: &str, guest_name: &str, reason: &str) -> Result<()>;
}

/// One pass over the unread mailbox: extract, validate completeness,
/// submit, notify, mark processed. Field-completeness checking lives
/// here, on purpose: the extractor reports missing data, it does not
/// enforce it.
pub struct Pipeline {
    mail: Arc<dyn MailSource>,
    desk: Arc<dyn BookingDesk>,
    notifier: Arc<dyn Notifier>,
    extractor: BookingExtractor,
}

impl Pipeline {
    pub fn new(
        mail: Arc<dyn MailSource>,
        desk: Arc<dyn BookingDesk>,
        notifier: Arc<dyn Notifier>,
        extractor: BookingExtractor,
    ) -> Self {
        Self {
            mail,
            desk,
            notifier,
            extractor,
        }
    }

    /// Fetch unread requests and process each one. Collaborator errors
    /// are contained per message; only a failed fetch aborts the pass.
    pub async fn process_pending(&self) -> Result<ProcessReport> {
        let requests = self.mail.fetch_unread().await?;
        let mut report = ProcessReport {
            fetched: requests.len(),
            ..Default::default()
        };

        if requests.is_empty() {
            info!("No new booking emails");
            return Ok(report);
        }
        info!("{} new booking request(s)", requests.len());

        for request in requests {
            info!("From: {}  |  {}", request.from_address, request.subject);
            self.process_one(&request, &mut report).await;
            if let Err(e) = self.mail.mark_processed(&request.uid).await {
                warn!("Failed to mark {} processed: {e}", request.uid);
            }
        }

        info!(
            "Pass complete: {} booked, {} rejected, {} failed",
            report.booked, report.rejected, report.failed
        );
        Ok(report)
    }

    async fn process_one(&self, request: &InboundRequest, report: &mut ProcessReport) {
        let booking = self
            .extractor
            .extract(&request.body, &request.sender_name, &request.from_address)
            .await;

        let missing = booking.missing_fields();
        if !missing.is_empty() {
            let reason = format!(
                "Your request was missing: {}. Please reply with all details.",
                missing.join(", ")
            );
            self.notify_failure(&request.from_address, &booking.guest_name, &reason)
                .await;
            report.rejected += 1;
            return;
        }

        match self.desk.submit(&booking, &request.from_address).await {
            Ok(result) if result.success => {
                let booking_id = result.booking_id.as_deref().unwrap_or("N/A");
                info!("Booking confirmed, id {}", booking_id);
                if let Err(e) = self
                    .notifier
                    .send_confirmation(
                        &request.from_address,
                        &booking.guest_name,
                        &booking,
                        booking_id,
                        &result.message,
                    )
                    .await
                {
                    warn!("Confirmation email failed: {e}");
                }
                report.booked += 1;
            }
            Ok(result) => {
                warn!("Booking failed: {}", result.message);
                self.notify_failure(&request.from_address, &booking.guest_name, &result.message)
                    .await;
                report.failed += 1;
            }
            Err(e) => {
                error!("Booking submission crashed: {e}");
                self.notify_failure(
                    &request.from_address,
                    &booking.guest_name,
                    &format!("Automation error: {e}"),
                )
                .await;
                report.failed += 1;
            }
        }
    }

    async fn notify_failure(&self, to: &str, guest_name: &str, reason: &str) {
        if let Err(e) = self.notifier.send_failure(to, guest_name, reason).await {
            warn!("Failure email could not be sent: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innbox_core::Error;
    use parking_lot::Mutex;

    struct MockMail {
        inbox: Mutex<Vec<InboundRequest>>,
        processed: Mutex<Vec<String>>,
    }

    impl MockMail {
        fn with(requests: Vec<InboundRequest>) -> Arc<Self> {
            Arc::new(Self {
                inbox: Mutex::new(requests),
                processed: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl MailSource for MockMail {
        async fn fetch_unread(&self) -> Result<Vec<InboundRequest>> {
            Ok(self.inbox.lock().clone())
        }

        async fn mark_processed(&self, uid: &str) -> Result<()> {
            self.processed.lock().push(uid.to_string());
            Ok(())
        }
    }

    struct MockDesk {
        // None means the desk itself errors out.
        outcome: Option<SubmissionResult>,
        submissions: Mutex<Vec<BookingRequest>>,
    }

    impl MockDesk {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                outcome: Some(SubmissionResult {
                    success: true,
                    message: "Booking created".into(),
                    booking_id: Some("BK-42".into()),
                }),
                submissions: Mutex::new(Vec::new()),
            })
        }

        fn crashing() -> Arc<Self> {
            Arc::new(Self {
                outcome: None,
                submissions: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl BookingDesk for MockDesk {
        async fn submit(
            &self,
            booking: &BookingRequest,
            _guest_email: &str,
        ) -> Result<SubmissionResult> {
            self.submissions.lock().push(booking.clone());
            match &self.outcome {
                Some(result) => Ok(result.clone()),
                None => Err(Error::Booking("form timed out".into())),
            }
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        confirmations: Mutex<Vec<(String, String)>>,
        failures: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send_confirmation(
            &self,
            to: &str,
            _guest_name: &str,
            _booking: &BookingRequest,
            booking_id: &str,
            _message: &str,
        ) -> Result<()> {
            self.confirmations
                .lock()
                .push((to.to_string(), booking_id.to_string()));
            Ok(())
        }

        async fn send_failure(&self, to: &str, _guest_name: &str, reason: &str) -> Result<()> {
            self.failures.lock().push((to.to_string(), reason.to_string()));
            Ok(())
        }
    }

    fn request(body: &str) -> InboundRequest {
        InboundRequest {
            uid: "101".into(),
            subject: "Room Booking".into(),
            from_address: "guest@example.com".into(),
            sender_name: "Grace Hall".into(),
            body: body.into(),
        }
    }

    fn pipeline(
        mail: Arc<MockMail>,
        desk: Arc<MockDesk>,
        notifier: Arc<MockNotifier>,
    ) -> Pipeline {
        Pipeline::new(mail, desk, notifier, BookingExtractor::heuristic_only())
    }

    #[tokio::test]
    async fn test_complete_request_is_booked_and_confirmed() {
        let mail = MockMail::with(vec![request(
            "Booking for Grace Hall. A deluxe room from 2026-03-22 to 2026-03-25 for 2 adults.",
        )]);
        let desk = MockDesk::succeeding();
        let notifier = Arc::new(MockNotifier::default());

        let report = pipeline(mail.clone(), desk.clone(), notifier.clone())
            .process_pending()
            .await
            .unwrap();

        assert_eq!(report.fetched, 1);
        assert_eq!(report.booked, 1);
        assert_eq!(report.rejected, 0);

        let submissions = desk.submissions.lock();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].guest_name, "Grace Hall");
        assert_eq!(submissions[0].check_in.as_deref(), Some("2026-03-22"));

        assert_eq!(
            notifier.confirmations.lock().as_slice(),
            &[("guest@example.com".to_string(), "BK-42".to_string())]
        );
        assert_eq!(mail.processed.lock().as_slice(), &["101".to_string()]);
    }

    #[tokio::test]
    async fn test_incomplete_request_is_bounced_with_missing_fields() {
        let mail = MockMail::with(vec![request("Hi, I am Bob. A room for tomorrow please.")]);
        let desk = MockDesk::succeeding();
        let notifier = Arc::new(MockNotifier::default());

        let report = pipeline(mail.clone(), desk.clone(), notifier.clone())
            .process_pending()
            .await
            .unwrap();

        assert_eq!(report.rejected, 1);
        assert_eq!(report.booked, 0);
        assert!(desk.submissions.lock().is_empty());

        let failures = notifier.failures.lock();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].1.contains("check-out date"));
        assert!(failures[0].1.contains("room type"));
        // Bounced messages still get marked so they are not re-processed.
        assert_eq!(mail.processed.lock().as_slice(), &["101".to_string()]);
    }

    #[tokio::test]
    async fn test_desk_error_notifies_and_continues() {
        let mail = MockMail::with(vec![request(
            "Booking for Grace Hall. A deluxe room from 2026-03-22 to 2026-03-25.",
        )]);
        let desk = MockDesk::crashing();
        let notifier = Arc::new(MockNotifier::default());

        let report = pipeline(mail.clone(), desk, notifier.clone())
            .process_pending()
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        let failures = notifier.failures.lock();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].1.contains("Automation error"));
        assert_eq!(mail.processed.lock().as_slice(), &["101".to_string()]);
    }
}
