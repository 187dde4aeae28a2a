//! The assembly info of one assembly.

/// The values of the known assembly info attributes.
///
/// Every field is absent when the assembly does not carry the attribute. Present scalar values are
/// never empty; `internals_visible_to` is either absent or holds at least one name, in the order
/// the attributes appear in metadata. A `ParseResult` holds no reference to the file it was
/// read from.
///
/// # Examples
///
/// ```rust
/// use asminfo::ParseResult;
///
/// let info = ParseResult::default();
/// assert_eq!(info.version(), None);
/// assert_eq!(info.internals_visible_to(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseResult {
    cls_compliant: Option<String>,
    company: Option<String>,
    com_visible: Option<String>,
    configuration: Option<String>,
    copyright: Option<String>,
    description: Option<String>,
    file_version: Option<String>,
    guid: Option<String>,
    informational_version: Option<String>,
    product: Option<String>,
    title: Option<String>,
    trademark: Option<String>,
    version: Option<String>,
    internals_visible_to: Option<Vec<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl ParseResult {
    /// Create a result from the values of all known attributes
    ///
    /// Empty strings and an empty `internals_visible_to` list are stored as absent.
    #[must_use]
    pub fn new(
        cls_compliant: Option<String>,
        company: Option<String>,
        com_visible: Option<String>,
        configuration: Option<String>,
        copyright: Option<String>,
        description: Option<String>,
        file_version: Option<String>,
        guid: Option<String>,
        informational_version: Option<String>,
        product: Option<String>,
        title: Option<String>,
        trademark: Option<String>,
        version: Option<String>,
        internals_visible_to: Option<Vec<String>>,
    ) -> Self {
        ParseResult {
            cls_compliant: non_empty(cls_compliant),
            company: non_empty(company),
            com_visible: non_empty(com_visible),
            configuration: non_empty(configuration),
            copyright: non_empty(copyright),
            description: non_empty(description),
            file_version: non_empty(file_version),
            guid: non_empty(guid),
            informational_version: non_empty(informational_version),
            product: non_empty(product),
            title: non_empty(title),
            trademark: non_empty(trademark),
            version: non_empty(version),
            internals_visible_to: internals_visible_to.filter(|names| !names.is_empty()),
        }
    }

    /// `CLSCompliant`, as `True` or `False`
    #[must_use]
    pub fn cls_compliant(&self) -> Option<&str> {
        self.cls_compliant.as_deref()
    }

    /// `AssemblyCompany`
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// `ComVisible`, as `True` or `False`
    #[must_use]
    pub fn com_visible(&self) -> Option<&str> {
        self.com_visible.as_deref()
    }

    /// `AssemblyConfiguration`
    #[must_use]
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
    }

    /// `AssemblyCopyright`
    #[must_use]
    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    /// `AssemblyDescription`
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `AssemblyFileVersion`
    #[must_use]
    pub fn file_version(&self) -> Option<&str> {
        self.file_version.as_deref()
    }

    /// `Guid`
    #[must_use]
    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    /// `AssemblyInformationalVersion`
    #[must_use]
    pub fn informational_version(&self) -> Option<&str> {
        self.informational_version.as_deref()
    }

    /// `AssemblyProduct`
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// `AssemblyTitle`
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// `AssemblyTrademark`
    #[must_use]
    pub fn trademark(&self) -> Option<&str> {
        self.trademark.as_deref()
    }

    /// `AssemblyVersion`
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The friend assemblies named by `InternalsVisibleTo`
    #[must_use]
    pub fn internals_visible_to(&self) -> Option<&[String]> {
        self.internals_visible_to.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_absent() {
        let result = ParseResult::new(
            None,
            Some("Acme".to_string()),
            Some("False".to_string()),
            Some(String::new()),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Some("1.2.3.4".to_string()),
            Some(Vec::new()),
        );

        assert_eq!(result.company(), Some("Acme"));
        assert_eq!(result.com_visible(), Some("False"));
        assert_eq!(result.configuration(), None);
        assert_eq!(result.version(), Some("1.2.3.4"));
        assert_eq!(result.internals_visible_to(), None);
        assert_eq!(result.cls_compliant(), None);
    }

    #[test]
    fn every_field_round_trips() {
        let value = |name: &str| Some(name.to_string());
        let result = ParseResult::new(
            value("True"),
            value("company"),
            value("False"),
            value("configuration"),
            value("copyright"),
            value("description"),
            value("file_version"),
            value("guid"),
            value("informational_version"),
            value("product"),
            value("title"),
            value("trademark"),
            value("version"),
            Some(vec!["TestsA".to_string(), "TestsB".to_string()]),
        );

        assert_eq!(result.cls_compliant(), Some("True"));
        assert_eq!(result.company(), Some("company"));
        assert_eq!(result.com_visible(), Some("False"));
        assert_eq!(result.configuration(), Some("configuration"));
        assert_eq!(result.copyright(), Some("copyright"));
        assert_eq!(result.description(), Some("description"));
        assert_eq!(result.file_version(), Some("file_version"));
        assert_eq!(result.guid(), Some("guid"));
        assert_eq!(result.informational_version(), Some("informational_version"));
        assert_eq!(result.product(), Some("product"));
        assert_eq!(result.title(), Some("title"));
        assert_eq!(result.trademark(), Some("trademark"));
        assert_eq!(result.version(), Some("version"));
        assert_eq!(
            result.internals_visible_to(),
            Some(&["TestsA".to_string(), "TestsB".to_string()][..])
        );
        assert_eq!(result.clone(), result);
    }
}
