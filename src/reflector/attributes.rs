//! The known assembly info attributes and the lookups that read them.
//!
//! Single-valued attributes are read with [`lookup_single`], which fails on duplicates;
//! `InternalsVisibleTo` may be applied any number of times and is read with [`lookup_all`].
//! Both take the decoder that turns the first constructor argument into text.

use strum::{EnumCount, EnumIter};

use crate::{
    metadata::{customattributes::CustomAttributeArgument, view::AssemblyAttribute},
    Error::{DuplicateAttribute, MissingArgument, TypeConversionInvalid},
    Result,
};

/// The assembly-level attributes reported in a [`crate::ParseResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum KnownAttribute {
    /// `System.CLSCompliantAttribute`
    ClsCompliant,
    /// `System.Reflection.AssemblyCompanyAttribute`
    Company,
    /// `System.Runtime.InteropServices.ComVisibleAttribute`
    ComVisible,
    /// `System.Reflection.AssemblyConfigurationAttribute`
    Configuration,
    /// `System.Reflection.AssemblyCopyrightAttribute`
    Copyright,
    /// `System.Reflection.AssemblyDescriptionAttribute`
    Description,
    /// `System.Reflection.AssemblyFileVersionAttribute`
    FileVersion,
    /// `System.Runtime.InteropServices.GuidAttribute`
    Guid,
    /// `System.Reflection.AssemblyInformationalVersionAttribute`
    InformationalVersion,
    /// `System.Reflection.AssemblyProductAttribute`
    Product,
    /// `System.Reflection.AssemblyTitleAttribute`
    Title,
    /// `System.Reflection.AssemblyTrademarkAttribute`
    Trademark,
    /// `System.Reflection.AssemblyVersionAttribute`
    Version,
    /// `System.Runtime.CompilerServices.InternalsVisibleToAttribute`
    InternalsVisibleTo,
}

impl KnownAttribute {
    /// The full name of the attribute type, as it appears in metadata
    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            KnownAttribute::ClsCompliant => "System.CLSCompliantAttribute",
            KnownAttribute::Company => "System.Reflection.AssemblyCompanyAttribute",
            KnownAttribute::ComVisible => "System.Runtime.InteropServices.ComVisibleAttribute",
            KnownAttribute::Configuration => "System.Reflection.AssemblyConfigurationAttribute",
            KnownAttribute::Copyright => "System.Reflection.AssemblyCopyrightAttribute",
            KnownAttribute::Description => "System.Reflection.AssemblyDescriptionAttribute",
            KnownAttribute::FileVersion => "System.Reflection.AssemblyFileVersionAttribute",
            KnownAttribute::Guid => "System.Runtime.InteropServices.GuidAttribute",
            KnownAttribute::InformationalVersion => {
                "System.Reflection.AssemblyInformationalVersionAttribute"
            }
            KnownAttribute::Product => "System.Reflection.AssemblyProductAttribute",
            KnownAttribute::Title => "System.Reflection.AssemblyTitleAttribute",
            KnownAttribute::Trademark => "System.Reflection.AssemblyTrademarkAttribute",
            KnownAttribute::Version => "System.Reflection.AssemblyVersionAttribute",
            KnownAttribute::InternalsVisibleTo => {
                "System.Runtime.CompilerServices.InternalsVisibleToAttribute"
            }
        }
    }

    /// True for attributes that may be applied more than once
    #[must_use]
    pub fn is_multi_valued(self) -> bool {
        self == KnownAttribute::InternalsVisibleTo
    }
}

/// Decoder of a single-valued attribute argument
pub type SingleDecoder = fn(&CustomAttributeArgument) -> Result<Option<String>>;

/// Decoder of one value of a multi-valued attribute, `None` drops the value
pub type MultiDecoder = fn(&CustomAttributeArgument) -> Option<String>;

fn bool_text(value: bool) -> String {
    String::from(if value { "True" } else { "False" })
}

/// Render an argument as text.
///
/// Booleans become `True`/`False`, numbers their decimal form, enums the value of their
/// underlying integer and types their serialized name. Null values and empty strings are
/// absent.
///
/// # Errors
/// Returns [`crate::Error::TypeConversionInvalid`] for arrays
pub fn string_form(argument: &CustomAttributeArgument) -> Result<Option<String>> {
    let text = match argument {
        CustomAttributeArgument::Bool(value) => bool_text(*value),
        CustomAttributeArgument::Char(value) => u32::from(*value).to_string(),
        CustomAttributeArgument::I1(value) => value.to_string(),
        CustomAttributeArgument::U1(value) => value.to_string(),
        CustomAttributeArgument::I2(value) => value.to_string(),
        CustomAttributeArgument::U2(value) => value.to_string(),
        CustomAttributeArgument::I4(value) => value.to_string(),
        CustomAttributeArgument::U4(value) => value.to_string(),
        CustomAttributeArgument::I8(value) => value.to_string(),
        CustomAttributeArgument::U8(value) => value.to_string(),
        CustomAttributeArgument::R4(value) => value.to_string(),
        CustomAttributeArgument::R8(value) => value.to_string(),
        CustomAttributeArgument::I(value) => value.to_string(),
        CustomAttributeArgument::U(value) => value.to_string(),
        CustomAttributeArgument::String(value) | CustomAttributeArgument::Type(value) => {
            match value {
                Some(text) => text.clone(),
                None => return Ok(None),
            }
        }
        CustomAttributeArgument::Enum(_, value) => return string_form(value),
        CustomAttributeArgument::Array(_) => return Err(TypeConversionInvalid),
    };

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Render a boolean argument as `True`/`False`
///
/// # Errors
/// Returns [`crate::Error::TypeConversionInvalid`] for anything but a boolean
pub fn boolean_form(argument: &CustomAttributeArgument) -> Result<Option<String>> {
    match argument {
        CustomAttributeArgument::Bool(value) => Ok(Some(bool_text(*value))),
        _ => Err(TypeConversionInvalid),
    }
}

/// Keep non-null strings, drop everything else
#[must_use]
pub fn string_value(argument: &CustomAttributeArgument) -> Option<String> {
    match argument {
        CustomAttributeArgument::String(Some(text)) => Some(text.clone()),
        _ => None,
    }
}

fn first_argument(
    attribute: &AssemblyAttribute<'_>,
    full_name: &str,
) -> Result<CustomAttributeArgument> {
    let mut value = attribute.value()?;
    if value.fixed_args.is_empty() {
        return Err(MissingArgument(full_name.to_string()));
    }

    Ok(value.fixed_args.swap_remove(0))
}

fn matching<'a, 'v>(
    attributes: &'a [AssemblyAttribute<'v>],
    full_name: &'a str,
) -> impl Iterator<Item = &'a AssemblyAttribute<'v>> {
    attributes
        .iter()
        .filter(move |attribute| attribute.type_name.as_deref() == Some(full_name))
}

/// Read an attribute that may be applied at most once
///
/// ## Arguments
/// * 'attributes' - The assembly attributes
/// * 'full_name'  - Full name of the attribute type, compared case-sensitively
/// * 'decoder'    - Turns the first constructor argument into text
///
/// # Errors
/// Returns [`crate::Error::DuplicateAttribute`] if more than one attribute matches,
/// [`crate::Error::MissingArgument`] if the match has no constructor argument, or the error of
/// decoding the value
pub fn lookup_single(
    attributes: &[AssemblyAttribute<'_>],
    full_name: &str,
    decoder: SingleDecoder,
) -> Result<Option<String>> {
    let mut matches = matching(attributes, full_name);

    let Some(attribute) = matches.next() else {
        return Ok(None);
    };
    if matches.next().is_some() {
        return Err(DuplicateAttribute(full_name.to_string()));
    }

    log::debug!("found {} ({})", full_name, attribute.token);
    decoder(&first_argument(attribute, full_name)?)
}

/// Read every application of an attribute, in table order
///
/// Values the decoder rejects are dropped. Yields `None` when nothing matches or every value
/// was dropped.
///
/// # Errors
/// Returns [`crate::Error::MissingArgument`] if a match has no constructor argument, or the
/// error of decoding a value blob
pub fn lookup_all(
    attributes: &[AssemblyAttribute<'_>],
    full_name: &str,
    decoder: MultiDecoder,
) -> Result<Option<Vec<String>>> {
    let mut values = Vec::new();
    for attribute in matching(attributes, full_name) {
        let argument = first_argument(attribute, full_name)?;
        match decoder(&argument) {
            Some(value) => values.push(value),
            None => log::warn!(
                "dropping {} value {:?} ({})",
                full_name,
                argument,
                attribute.token
            ),
        }
    }

    if values.is_empty() {
        Ok(None)
    } else {
        Ok(Some(values))
    }
}
