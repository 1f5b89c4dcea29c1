//! Notification email templates

use crate::models::contact::Submission;

pub struct RenderedEmail {
    pub subject: &'static str,
    pub html: String,
}

/// Render the notification for a submission. All user input is HTML-escaped.
pub fn render(submission: &Submission) -> RenderedEmail {
    match submission {
        Submission::Quotation(q) => RenderedEmail {
            subject: "Nueva Cotización desde el formulario",
            html: page(
                "Nueva Cotización Recibida",
                "Se ha recibido una nueva solicitud de cotización con los siguientes datos:",
                &[
                    ("Nombre", format!("{} {}", q.first_name, q.last_name)),
                    ("Email", q.email.clone()),
                    ("Teléfono", q.phone.clone()),
                    ("Dirección", q.address.clone()),
                    ("Rol", q.role.clone()),
                ],
            ),
        },
        Submission::ContactMessage(m) => RenderedEmail {
            subject: "Nuevo mensaje de contacto",
            html: page(
                "Nuevo Mensaje de Contacto",
                "Se ha recibido un nuevo mensaje desde el formulario de contacto:",
                &[
                    ("Nombre", format!("{} {}", m.first_name, m.last_name)),
                    ("Email", m.email.clone()),
                    ("Teléfono", m.phone.clone()),
                    ("Mensaje", m.message.clone()),
                ],
            ),
        },
    }
}

fn page(title: &str, intro: &str, rows: &[(&str, String)]) -> String {
    let mut html = String::new();
    html.push_str(r#"<div style="font-family: Arial, sans-serif; color: #333;">"#);
    html.push_str(&format!(
        r#"<h2 style="background-color: #8ad1da; padding: 10px; border-radius: 5px; color: white;">{}</h2>"#,
        title
    ));
    html.push_str(&format!("<p>{}</p>", intro));
    html.push_str(r#"<table style="width: 100%; border-collapse: collapse;"><tbody>"#);
    for (label, value) in rows {
        html.push_str(&format!(
            r#"<tr><td style="padding: 8px; border: 1px solid #ccc;"><strong>{}:</strong></td><td style="padding: 8px; border: 1px solid #ccc;">{}</td></tr>"#,
            label,
            escape_html(value)
        ));
    }
    html.push_str("</tbody></table></div>");
    html
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}
