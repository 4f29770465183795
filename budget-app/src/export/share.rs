use budget_core::composer::content::PRODUCT_NAME;
use budget_core::{FieldId, RawForm};

use super::ExportError;
use crate::platform::{Opener, ShareRequest, ShareSheet};

pub const SHARE_TEXT: &str = "Confira este orçamento profissional gerado com IA.";

/// How the document ended up being shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The share sheet was unavailable or dismissed; this `mailto:` link was
    /// opened instead.
    Emailed(String),
}

/// `Orçamento de <company> para <client>`, names as typed.
pub fn share_title(raw: &RawForm) -> String {
    format!(
        "Orçamento de {} para {}",
        raw.get(FieldId::CompanyName),
        raw.get(FieldId::ClientName)
    )
}

pub fn mail_body() -> String {
    format!("Segue orçamento em anexo. Gerado com {PRODUCT_NAME}.")
}

pub fn mailto_link(
    subject: &str,
    body: &str,
) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

pub async fn export(
    raw: &RawForm,
    sheet: &dyn ShareSheet,
    opener: &dyn Opener,
) -> Result<ShareOutcome, ExportError> {
    let title = share_title(raw);
    let request = ShareRequest {
        title: title.clone(),
        text: SHARE_TEXT.to_string(),
    };

    match sheet.share(&request).await {
        Ok(()) => Ok(ShareOutcome::Shared),
        Err(reason) => {
            tracing::info!(%reason, "share sheet unusable, falling back to e-mail");
            let link = mailto_link(&title, &mail_body());
            opener.open(&link).await?;
            Ok(ShareOutcome::Emailed(link))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mailto_link_escapes_query_delimiters() {
        assert_eq!(
            mailto_link("a b&c=d", "x?y#z"),
            "mailto:?subject=a%20b%26c%3Dd&body=x%3Fy%23z"
        );
    }

    #[test]
    fn mailto_link_carries_subject_and_body() {
        let raw = RawForm::new()
            .with(FieldId::CompanyName, "Acme")
            .with(FieldId::ClientName, "Bob");

        assert_eq!(
            mailto_link(&share_title(&raw), &mail_body()),
            "mailto:?subject=Or%C3%A7amento%20de%20Acme%20para%20Bob\
             &body=Segue%20or%C3%A7amento%20em%20anexo.%20Gerado%20com%20IA%20Or%C3%A7amentos%20Pro."
        );
    }
}
