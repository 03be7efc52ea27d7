//! Error rendering with Accept negotiation.

use crate::error::Error;
use http::StatusCode;
use serde_json::json;
use stackline_conf::{ErrorFormat, Settings};
use stackline_http::Response;

/// Renders an [`Error`] into a [`Response`]
///
/// The output format follows the client's `Accept` header. Without
/// `display_details` only the status and a generic description are shown.
#[derive(Debug, Clone)]
pub struct ErrorRenderer {
	display_details: bool,
	default_format: ErrorFormat,
}

impl Default for ErrorRenderer {
	fn default() -> Self {
		Self::from_settings(&Settings::default())
	}
}

impl ErrorRenderer {
	pub fn new(display_details: bool, default_format: ErrorFormat) -> Self {
		Self {
			display_details,
			default_format,
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self::new(settings.display_error_details, settings.default_error_format)
	}

	/// Pick an output format for an `Accept` header value
	///
	/// Media ranges are tried in order of quality. `*/*` and a missing header
	/// fall back to the default format.
	///
	/// # Examples
	///
	/// ```
	/// use stackline_conf::ErrorFormat;
	/// use stackline_stack::ErrorRenderer;
	///
	/// let renderer = ErrorRenderer::new(false, ErrorFormat::Json);
	/// assert_eq!(renderer.negotiate(Some("text/html, application/json;q=0.5")), ErrorFormat::Html);
	/// assert_eq!(renderer.negotiate(Some("image/png")), ErrorFormat::Json);
	/// assert_eq!(renderer.negotiate(None), ErrorFormat::Json);
	/// ```
	pub fn negotiate(&self, accept: Option<&str>) -> ErrorFormat {
		let Some(accept) = accept else {
			return self.default_format;
		};

		let mut ranges: Vec<(&str, f32)> = accept
			.split(',')
			.filter_map(|range| parse_media_range(range.trim()))
			.filter(|(_, quality)| *quality > 0.0)
			.collect();
		// Stable sort keeps header order among equal qualities
		ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

		ranges
			.into_iter()
			.find_map(|(media_type, _)| self.format_for(media_type))
			.unwrap_or(self.default_format)
	}

	fn format_for(&self, media_type: &str) -> Option<ErrorFormat> {
		match media_type {
			"*/*" => Some(self.default_format),
			"application/json" => Some(ErrorFormat::Json),
			"text/html" | "application/xhtml+xml" => Some(ErrorFormat::Html),
			"application/xml" | "text/xml" => Some(ErrorFormat::Xml),
			"text/plain" => Some(ErrorFormat::Text),
			other if other.ends_with("+json") => Some(ErrorFormat::Json),
			other if other.ends_with("+xml") => Some(ErrorFormat::Xml),
			_ => None,
		}
	}

	/// Render using the format negotiated from `accept`
	pub fn render_for(&self, error: &Error, accept: Option<&str>) -> Response {
		self.render(error, self.negotiate(accept))
	}

	/// Render in a specific format
	pub fn render(&self, error: &Error, format: ErrorFormat) -> Response {
		let status = error.status();
		let title = title(status);
		let description = description(status);
		let details = if self.display_details {
			error_chain(error)
		} else {
			Vec::new()
		};

		let body = match format {
			ErrorFormat::Json => render_json(status, &title, description, &details),
			ErrorFormat::Html => render_html(&title, description, &details),
			ErrorFormat::Xml => render_xml(&title, description, &details),
			ErrorFormat::Text => render_text(&title, description, &details),
		};

		Response::new(status)
			.with_content_type(format.content_type())
			.with_body(body)
	}
}

/// Messages from the innermost non-envelope error down its source chain
pub fn error_chain(error: &Error) -> Vec<String> {
	let start: &Error = match error.as_http() {
		Some(envelope) => envelope.root_cause(),
		None => error,
	};

	let mut chain = vec![start.to_string()];
	let mut current = std::error::Error::source(start);
	while let Some(source) = current {
		let message = source.to_string();
		if chain.last() != Some(&message) {
			chain.push(message);
		}
		current = source.source();
	}
	chain
}

fn parse_media_range(range: &str) -> Option<(&str, f32)> {
	let mut parts = range.split(';');
	let media_type = parts.next()?.trim();
	if !media_type.contains('/') {
		return None;
	}

	let mut quality = 1.0;
	for param in parts {
		if let Some(("q", value)) = param.trim().split_once('=').map(|(k, v)| (k.trim(), v.trim())) {
			quality = value.parse().unwrap_or(0.0);
		}
	}
	Some((media_type, quality))
}

fn title(status: StatusCode) -> String {
	format!(
		"{} {}",
		status.as_u16(),
		status.canonical_reason().unwrap_or("Error")
	)
}

fn description(status: StatusCode) -> &'static str {
	match status {
		StatusCode::BAD_REQUEST => "The server cannot process the request due to a client error.",
		StatusCode::UNAUTHORIZED => "The request requires valid user authentication.",
		StatusCode::FORBIDDEN => "You are not permitted to perform the requested operation.",
		StatusCode::NOT_FOUND => "The requested resource could not be found.",
		StatusCode::METHOD_NOT_ALLOWED => "The request method is not supported for the requested resource.",
		_ => "An unexpected condition prevented the server from fulfilling the request.",
	}
}

fn render_json(status: StatusCode, title: &str, description: &str, details: &[String]) -> String {
	let mut body = json!({
		"status": status.as_u16(),
		"message": title,
		"description": description,
	});
	if !details.is_empty() {
		body["details"] = json!(details);
	}
	// Serializing a Value built from strings and numbers cannot fail
	serde_json::to_string_pretty(&body).unwrap_or_default()
}

fn render_html(title: &str, description: &str, details: &[String]) -> String {
	let title = escape(title);
	let mut html = format!(
		"<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<p>{}</p>\n",
		escape(description)
	);
	if !details.is_empty() {
		html.push_str("<h2>Details</h2>\n<ul>\n");
		for detail in details {
			html.push_str(&format!("<li>{}</li>\n", escape(detail)));
		}
		html.push_str("</ul>\n");
	}
	html.push_str("</body>\n</html>\n");
	html
}

fn render_xml(title: &str, description: &str, details: &[String]) -> String {
	let mut xml = format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<error>\n  <message>{}</message>\n  <description>{}</description>\n",
		escape(title),
		escape(description)
	);
	for detail in details {
		xml.push_str(&format!("  <detail>{}</detail>\n", escape(detail)));
	}
	xml.push_str("</error>\n");
	xml
}

fn render_text(title: &str, description: &str, details: &[String]) -> String {
	let mut text = format!("{}\n{}\n", title, description);
	if !details.is_empty() {
		text.push_str("\nDetails:\n");
		for detail in details {
			text.push_str(&format!("  - {}\n", detail));
		}
	}
	text
}

fn escape(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::HttpError;
	use rstest::rstest;
	use stackline_http::Request;

	fn not_found() -> Error {
		let request = Request::builder().uri("/missing").build().unwrap();
		HttpError::new(request, Response::ok(), Error::Internal("no route for <missing>".into()))
			.with_status(StatusCode::NOT_FOUND)
			.into()
	}

	#[rstest]
	#[case("application/json", ErrorFormat::Json)]
	#[case("application/problem+json", ErrorFormat::Json)]
	#[case("text/html,application/xhtml+xml", ErrorFormat::Html)]
	#[case("text/xml", ErrorFormat::Xml)]
	#[case("text/plain", ErrorFormat::Text)]
	#[case("text/plain;q=0.2, application/xml;q=0.9", ErrorFormat::Xml)]
	#[case("text/html;q=0, text/plain", ErrorFormat::Text)]
	#[case("*/*", ErrorFormat::Html)]
	#[case("image/webp", ErrorFormat::Html)]
	#[case("garbage", ErrorFormat::Html)]
	fn test_negotiate(#[case] accept: &str, #[case] expected: ErrorFormat) {
		let renderer = ErrorRenderer::new(false, ErrorFormat::Html);

		assert_eq!(renderer.negotiate(Some(accept)), expected);
	}

	#[rstest]
	fn test_render_json_without_details() {
		let renderer = ErrorRenderer::new(false, ErrorFormat::Json);

		let response = renderer.render(&not_found(), ErrorFormat::Json);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();

		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(response.headers.get("content-type").unwrap(), "application/json");
		assert_eq!(body["status"], 404);
		assert_eq!(body["message"], "404 Not Found");
		assert!(body.get("details").is_none());
	}

	#[rstest]
	fn test_render_json_with_details() {
		let renderer = ErrorRenderer::new(true, ErrorFormat::Json);

		let response = renderer.render(&not_found(), ErrorFormat::Json);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();

		assert_eq!(body["details"][0], "Internal error: no route for <missing>");
	}

	#[rstest]
	fn test_render_html_escapes_details() {
		let renderer = ErrorRenderer::new(true, ErrorFormat::Json);

		let response = renderer.render(&not_found(), ErrorFormat::Html);
		let body = response.body_text();

		assert!(body.contains("<title>404 Not Found</title>"));
		assert!(body.contains("&lt;missing&gt;"));
		assert!(!body.contains("<missing>"));
	}

	#[rstest]
	fn test_render_xml_and_text() {
		let renderer = ErrorRenderer::new(false, ErrorFormat::Json);

		let xml = renderer.render(&not_found(), ErrorFormat::Xml).body_text();
		let text = renderer.render(&not_found(), ErrorFormat::Text).body_text();

		assert!(xml.contains("<message>404 Not Found</message>"));
		assert!(text.starts_with("404 Not Found\n"));
		assert!(!text.contains("Details"));
	}

	#[rstest]
	fn test_plain_error_renders_as_500() {
		let renderer = ErrorRenderer::default();

		let response = renderer.render_for(&Error::Unresolvable("auth".into()), None);

		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[rstest]
	fn test_error_chain_follows_sources() {
		let io = std::io::Error::other("connection reset");
		let chain = error_chain(&Error::custom(io));

		assert_eq!(chain, vec!["connection reset".to_string()]);
	}
}
