use crate::types::MailContext;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug)]
pub enum Error {
    NotSent,
}

type Result<T> = std::result::Result<T, Error>;

const VERIFY_EMAIL_TEMPLATE: &str = "\
<h2>Hello {{name}},</h2>\
<p>Please confirm your email address by entering this code:</p>\
<h3>{{code}}</h3>";

fn render(template: &str, vars: &[(&str, String)]) -> String {
    let body = match template {
        "verify-email" => VERIFY_EMAIL_TEMPLATE,
        _ => "{{body}}",
    };

    vars.iter().fold(body.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}

pub async fn send(
    mail: MailContext,
    to: String,
    subject: &str,
    template: &str,
    vars: Vec<(&str, String)>,
) -> Result<()> {
    let message = Message::builder()
        .from(mail.sender.parse().map_err(|err| {
            tracing::error!("Invalid mail sender {}: {:?}", mail.sender, err);
            Error::NotSent
        })?)
        .to(to.parse().map_err(|err| {
            tracing::error!("Invalid mail recipient {}: {:?}", to, err);
            Error::NotSent
        })?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(render(template, &vars))
        .map_err(|err| {
            tracing::error!("Failed to build email: {:?}", err);
            Error::NotSent
        })?;

    let transport: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(mail.host.as_str())
            .map_err(|err| {
                tracing::error!("Failed to build mail transport: {:?}", err);
                Error::NotSent
            })?
            .credentials(Credentials::new(mail.user.clone(), mail.password.clone()))
            .build();

    match transport.send(message).await {
        Ok(_) => Ok(()),
        Err(err) => {
            tracing::error!("Failed to send email: {:?}", err);
            Err(Error::NotSent)
        }
    }
}

pub async fn send_verification_email(mail: MailContext, to: String, code: String) -> Result<()> {
    let name = to.clone();
    send(
        mail,
        to,
        "Verify Your Email",
        "verify-email",
        vec![("name", name), ("code", code)],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_every_var() {
        let body = render(
            "verify-email",
            &[
                ("name", "jane@example.com".to_string()),
                ("code", "01J5".to_string()),
            ],
        );

        assert!(body.contains("jane@example.com"));
        assert!(body.contains("01J5"));
        assert!(!body.contains("{{"));
    }

    #[test]
    fn render_falls_back_to_plain_body() {
        let body = render("unknown-template", &[("body", "hi".to_string())]);
        assert_eq!(body, "hi");
    }
}
