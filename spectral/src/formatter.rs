use colored::*;
use spectral_core::client::{BoundOperation, Connection, OperationResponse};
use spectral_core::description::ObjectType;
use spectral_core::query::{ColumnMetadata, FeatureCollection};
use spectral_core::transport::Transport;
use std::collections::BTreeMap;
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct ServiceList(pub BTreeMap<String, String>);

pub struct NameList(pub &'static str, pub Vec<String>);

pub struct ServiceDescription<'a, T>(pub &'a str, pub &'a Connection<T>);

pub struct TableDescription<'a>(pub &'a str, pub Vec<ColumnMetadata>);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<FeatureCollection> for FormattedString {
    fn from(collection: FeatureCollection) -> Self {
        match serde_json::to_value(collection) {
            Ok(value) => FormattedString::from(value),
            Err(err) => FormattedString::from(GenericError("Invalid feature collection", err)),
        }
    }
}

/// Pretty-prints JSON bodies; anything else is printed as text.
impl From<OperationResponse> for FormattedString {
    fn from(response: OperationResponse) -> Self {
        match response {
            OperationResponse::Body(body) => {
                match serde_json::from_slice::<serde_json::Value>(&body) {
                    Ok(value) => FormattedString::from(value),
                    Err(_) => FormattedString(String::from_utf8_lossy(&body).into_owned()),
                }
            }
            OperationResponse::Error(message) => {
                FormattedString(format!("{} {}", "Call Failed:".red().bold(), message))
            }
        }
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<ServiceList> for FormattedString {
    fn from(ServiceList(services): ServiceList) -> Self {
        if services.is_empty() {
            return FormattedString("No services found.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str("Available Services:\n");
        for (name, url) in services {
            out.push_str(&format!("  - {} {}\n", name.green(), url.dimmed()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<NameList> for FormattedString {
    fn from(NameList(title, names): NameList) -> Self {
        if names.is_empty() {
            return FormattedString(
                format!("No {} found.", title.to_lowercase())
                    .yellow()
                    .to_string(),
            );
        }

        let mut out = format!("Available {title}:\n");
        for name in names {
            out.push_str(&format!("  - {}\n", name.green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl<T: Transport> From<ServiceDescription<'_, T>> for FormattedString {
    fn from(ServiceDescription(name, connection): ServiceDescription<'_, T>) -> Self {
        let mut out = String::new();
        out.push_str(&format!("{} {} {{\n", "service".cyan(), name.green()));

        for operation in connection.operation_names().filter_map(|n| connection.operation(n)) {
            let description = operation.description();
            out.push_str(&format!(
                "  {} {} {}\n",
                description.method.to_string().cyan(),
                operation.name().green(),
                description.url.dimmed()
            ));
        }
        out.push('}');
        FormattedString(out)
    }
}

/// Everything needed to call an operation: where it goes and which arguments it accepts.
impl<T: Transport> From<BoundOperation<'_, T>> for FormattedString {
    fn from(operation: BoundOperation<'_, T>) -> Self {
        let description = operation.description();
        let mut out = String::new();

        out.push_str(&format!(
            "{} {} {{\n",
            description.method.to_string().cyan(),
            operation.name().green()
        ));
        out.push_str(&format!("  url: {}\n", description.url));
        out.push_str(&format!("  content type: {}\n", description.content_type));

        if !description.params.is_empty() {
            out.push_str(&format!("\n  {}\n", "// URL parameters".dimmed()));
            for (local_name, param) in &description.params {
                out.push_str(&format!(
                    "  {} {} = {};\n",
                    param.kind.yellow(),
                    local_name,
                    param.name.dimmed()
                ));
            }
        }

        if let Some(request_type) = operation.request_type() {
            out.push_str(&format!(
                "\n  {} {}\n",
                "// request body:".dimmed(),
                request_type.name.yellow()
            ));
            out.push_str(&object_type_fields(request_type, "  "));
        }

        if let Some(response_type) = &description.response_type {
            out.push_str(&format!(
                "\n  {} {}\n",
                "returns".cyan(),
                response_type.yellow()
            ));
        }

        out.push('}');
        FormattedString(out)
    }
}

impl From<&ObjectType> for FormattedString {
    fn from(object_type: &ObjectType) -> Self {
        let mut out = format!("{} {}", "type".cyan(), object_type.name.green());

        if !object_type.bases.is_empty() {
            out.push_str(&format!(
                " {} {}",
                "extends".cyan(),
                object_type.bases.join(", ").yellow()
            ));
        }

        out.push_str(" {\n");
        out.push_str(&object_type_fields(object_type, ""));
        out.push('}');
        FormattedString(out)
    }
}

impl From<TableDescription<'_>> for FormattedString {
    fn from(TableDescription(table, columns): TableDescription<'_>) -> Self {
        let mut out = format!("{} {} {{\n", "table".cyan(), table.green());

        for column in columns {
            let precision = match (column.total_digits, column.fractional_digits) {
                (Some(total), Some(fraction)) => format!("({total}, {fraction})"),
                (Some(total), None) => format!("({total})"),
                _ => String::new(),
            };
            out.push_str(&format!(
                "  {}{} {};\n",
                column.kind.yellow(),
                precision,
                column.name
            ));
        }
        out.push('}');
        FormattedString(out)
    }
}

fn object_type_fields(object_type: &ObjectType, indent: &str) -> String {
    let mut out = String::new();

    for attribute in &object_type.attributes {
        out.push_str(&format!("{indent}  {} {};\n", "attribute".purple(), attribute));
    }
    for element in &object_type.elements {
        out.push_str(&format!("{indent}  {} {};\n", "element".purple(), element));
    }
    out
}
