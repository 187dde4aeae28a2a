//! Read-only view of the metadata of one loaded module.
//!
//! [`ModuleView`] owns the loaded [`File`] and borrows the CLI header, metadata root, heaps and
//! tables from it. On top of the raw tables it resolves what attribute lookup needs:
//!
//! - the custom attributes applied to the assembly itself (parent `Assembly`, row 1)
//! - the full type name of each attribute, through `MemberRef` or `MethodDef` constructors
//! - the constructor parameter kinds, from the constructor signature, so that the value blob
//!   can be decoded
//!
//! # Examples
//!
//! ```rust,no_run
//! use asminfo::ModuleView;
//! use std::path::Path;
//!
//! let view = ModuleView::from_file(Path::new("bin/Release/Acme.dll"))?;
//! for attribute in view.assembly_attributes(64)? {
//!     if attribute.type_name.as_deref() == Some("System.Reflection.AssemblyCompanyAttribute") {
//!         println!("{:?}", attribute.value()?.fixed_args);
//!     }
//! }
//! # Ok::<(), asminfo::Error>(())
//! ```

use std::{fs, path::Path, sync::Arc};

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        customattributes::{
            parse_custom_attribute_data, ArgumentKind, CustomAttributeValue, SERIALIZATION_TYPE,
        },
        root::Root,
        signatures::{parse_field_signature, parse_method_signature, TypeSignature},
        streams::{Blob, Guid, Strings, TablesHeader},
        tables::{
            AssemblyRaw, CodedIndex, CustomAttributeRaw, FieldPtrRaw, FieldRaw, MemberRefRaw,
            MethodDefRaw, MethodPtrRaw, ModuleRaw, NestedClassRaw, TableId, TypeDefRaw,
            TypeRefRaw,
        },
        token::Token,
    },
    Error::RecursionLimit,
    Result,
};

/// How the file of a [`ModuleView`] is brought into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Map the file read-only; the mapping lives as long as the view
    #[default]
    MemoryMapped,
    /// Read the whole file into an owned buffer; no handle or mapping is kept
    Buffered,
}

/// Name of the field holding the value of an enum
const ENUM_VALUE_FIELD: &str = "value__";

/// The parsed metadata structures, borrowing from the file data.
pub struct ModuleViewData<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root with the stream directory
    pub metadata_root: Root,
    /// The `#~` (or `#-`) stream
    pub tables: TablesHeader<'a>,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap
    pub blobs: Blob<'a>,
    /// The `#GUID` heap, absent in some hand-made modules
    pub guids: Option<Guid<'a>>,
}

impl<'a> ModuleViewData<'a> {
    /// Locate and parse the metadata of `file`
    ///
    /// # Errors
    /// Returns an error if the CLI header, the metadata root or one of the required streams
    /// (`#~`, `#Strings`, `#Blob`) is missing or malformed
    pub fn from_file(file: &'a File) -> Result<Self> {
        let (clr_rva, clr_size) = file.clr();
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let metadata_root = Root::read(metadata)?;

        let stream_data = |name: &str| {
            metadata_root.stream(name).map(|stream| {
                let start = stream.offset as usize;
                &metadata[start..start + stream.size as usize]
            })
        };

        let Some(tables_data) = stream_data("#~").or_else(|| stream_data("#-")) else {
            return Err(malformed_error!("Metadata has no #~ stream"));
        };
        let Some(strings_data) = stream_data("#Strings") else {
            return Err(malformed_error!("Metadata has no #Strings stream"));
        };
        let Some(blob_data) = stream_data("#Blob") else {
            return Err(malformed_error!("Metadata has no #Blob stream"));
        };

        let tables = TablesHeader::from(tables_data)?;
        let strings = Strings::from(strings_data)?;
        let blobs = Blob::from(blob_data)?;
        let guids = stream_data("#GUID").map(Guid::from).transpose()?;

        log::debug!(
            "metadata {} with {} streams and {} tables",
            metadata_root.version,
            metadata_root.stream_headers.len(),
            tables.table_count()
        );

        Ok(ModuleViewData {
            cor20header,
            metadata_root,
            tables,
            strings,
            blobs,
            guids,
        })
    }

    fn module(&self) -> Result<ModuleRaw> {
        match self.tables.table::<ModuleRaw>() {
            Some(table) => table.get(1),
            None => Err(malformed_error!("Metadata has no Module row")),
        }
    }

    fn assembly(&self) -> Result<AssemblyRaw> {
        match self.tables.table::<AssemblyRaw>() {
            Some(table) => table.get(1),
            None => Err(malformed_error!("Module is not an assembly, it has no Assembly row")),
        }
    }

    /// Custom attribute rows whose parent is the assembly, in table order
    fn assembly_attribute_rows(&self) -> Result<Vec<CustomAttributeRaw>> {
        let assembly = self.assembly()?;
        let Some(table) = self.tables.table::<CustomAttributeRaw>() else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for row in &table {
            let row = row?;
            if row.parent.tag == TableId::Assembly && row.parent.row == assembly.rid {
                rows.push(row);
            }
        }

        Ok(rows)
    }

    /// Full name of the type declaring the attribute constructor `constructor`
    fn attribute_type_name(
        &self,
        constructor: &CodedIndex,
        max_depth: usize,
    ) -> Result<Option<String>> {
        match constructor.tag {
            TableId::MemberRef => {
                let member = self.member_ref(constructor.row)?;
                let name = match member.class.tag {
                    TableId::TypeRef => self.type_ref_name(member.class.row, 0, max_depth)?,
                    TableId::TypeDef => self.type_def_name(member.class.row, 0, max_depth)?,
                    _ => return Ok(None),
                };
                Ok(Some(name))
            }
            TableId::MethodDef => match self.method_owner(constructor.row)? {
                Some(owner) => Ok(Some(self.type_def_name(owner, 0, max_depth)?)),
                None => Ok(None),
            },
            _ => Err(malformed_error!(
                "Invalid custom attribute constructor - {}",
                constructor.token
            )),
        }
    }

    fn member_ref(&self, rid: u32) -> Result<MemberRefRaw> {
        match self.tables.table::<MemberRefRaw>() {
            Some(table) => table.get(rid),
            None => Err(out_of_bounds_error!()),
        }
    }

    fn method_def(&self, rid: u32) -> Result<MethodDefRaw> {
        match self.tables.table::<MethodDefRaw>() {
            Some(table) => table.get(rid),
            None => Err(out_of_bounds_error!()),
        }
    }

    fn qualified_name(&self, namespace: u32, name: u32) -> Result<String> {
        let namespace = self.strings.get(namespace as usize)?;
        let name = self.strings.get(name as usize)?;

        if namespace.is_empty() {
            Ok(name.to_string())
        } else {
            Ok(format!("{namespace}.{name}"))
        }
    }

    fn type_ref_name(&self, rid: u32, depth: usize, max_depth: usize) -> Result<String> {
        if depth >= max_depth {
            return Err(RecursionLimit(max_depth));
        }

        let Some(table) = self.tables.table::<TypeRefRaw>() else {
            return Err(out_of_bounds_error!());
        };
        let type_ref = table.get(rid)?;
        let name = self.qualified_name(type_ref.type_namespace, type_ref.type_name)?;

        if type_ref.resolution_scope.tag == TableId::TypeRef && !type_ref.resolution_scope.is_null()
        {
            let outer = self.type_ref_name(type_ref.resolution_scope.row, depth + 1, max_depth)?;
            return Ok(format!("{outer}/{name}"));
        }

        Ok(name)
    }

    fn type_def_name(&self, rid: u32, depth: usize, max_depth: usize) -> Result<String> {
        if depth >= max_depth {
            return Err(RecursionLimit(max_depth));
        }

        let Some(table) = self.tables.table::<TypeDefRaw>() else {
            return Err(out_of_bounds_error!());
        };
        let type_def = table.get(rid)?;
        let name = self.qualified_name(type_def.type_namespace, type_def.type_name)?;

        if type_def.is_nested() {
            if let Some(enclosing) = self.enclosing_type(rid)? {
                let outer = self.type_def_name(enclosing, depth + 1, max_depth)?;
                return Ok(format!("{outer}/{name}"));
            }
        }

        Ok(name)
    }

    fn enclosing_type(&self, rid: u32) -> Result<Option<u32>> {
        let Some(table) = self.tables.table::<NestedClassRaw>() else {
            return Ok(None);
        };

        for row in &table {
            let row = row?;
            if row.nested_class == rid {
                return Ok(Some(row.enclosing_class));
            }
        }

        Ok(None)
    }

    /// The TypeDef owning the MethodDef row `method`, from the `MethodList` ranges
    fn method_owner(&self, method: u32) -> Result<Option<u32>> {
        let method_count = self.tables.row_count(TableId::MethodDef);

        // With MethodPtr present, MethodList indexes the indirection table
        let (position, list_len) = match self.tables.table::<MethodPtrRaw>() {
            Some(pointers) => {
                let mut position = None;
                for row in &pointers {
                    let row = row?;
                    if row.method == method {
                        position = Some(row.rid);
                        break;
                    }
                }

                match position {
                    Some(position) => (position, pointers.row_count()),
                    None => return Ok(None),
                }
            }
            None => (method, method_count),
        };

        let Some(types) = self.tables.table::<TypeDefRaw>() else {
            return Ok(None);
        };
        let starts = types
            .iter()
            .map(|row| row.map(|type_def| type_def.method_list))
            .collect::<Result<Vec<u32>>>()?;

        Ok(owning_range(&starts, position, list_len))
    }

    /// The Field rows of the TypeDef `rid`, honoring FieldPtr
    fn fields_of(&self, rid: u32) -> Result<Vec<FieldRaw>> {
        let Some(types) = self.tables.table::<TypeDefRaw>() else {
            return Ok(Vec::new());
        };
        let Some(fields) = self.tables.table::<FieldRaw>() else {
            return Ok(Vec::new());
        };

        let pointers = self.tables.table::<FieldPtrRaw>();
        let list_len = pointers
            .as_ref()
            .map_or(fields.row_count(), |pointers| pointers.row_count());

        let start = types.get(rid)?.field_list;
        let end = if rid < types.row_count() {
            types.get(rid + 1)?.field_list
        } else {
            list_len + 1
        };

        let mut result = Vec::new();
        for position in start..end.min(list_len + 1) {
            let field = match &pointers {
                Some(pointers) => pointers.get(position)?.field,
                None => position,
            };
            result.push(fields.get(field)?);
        }

        Ok(result)
    }

    /// The `SERIALIZATION_TYPE` of the underlying integer of the local enum `rid`
    fn enum_underlying_type(&self, rid: u32) -> Result<u8> {
        for field in self.fields_of(rid)? {
            if !field.is_instance() || self.strings.get(field.name as usize)? != ENUM_VALUE_FIELD {
                continue;
            }

            let signature = parse_field_signature(self.blobs.get(field.signature as usize)?)?;
            return match signature.base {
                TypeSignature::Boolean => Ok(SERIALIZATION_TYPE::BOOLEAN),
                TypeSignature::Char => Ok(SERIALIZATION_TYPE::CHAR),
                TypeSignature::I1 => Ok(SERIALIZATION_TYPE::I1),
                TypeSignature::U1 => Ok(SERIALIZATION_TYPE::U1),
                TypeSignature::I2 => Ok(SERIALIZATION_TYPE::I2),
                TypeSignature::U2 => Ok(SERIALIZATION_TYPE::U2),
                TypeSignature::I4 => Ok(SERIALIZATION_TYPE::I4),
                TypeSignature::U4 => Ok(SERIALIZATION_TYPE::U4),
                TypeSignature::I8 => Ok(SERIALIZATION_TYPE::I8),
                TypeSignature::U8 => Ok(SERIALIZATION_TYPE::U8),
                other => Err(malformed_error!(
                    "Invalid enum underlying type - {:?}",
                    other
                )),
            };
        }

        Err(malformed_error!(
            "TypeDef {} is not an enum, it has no {} field",
            Token::from_parts(TableId::TypeDef, rid),
            ENUM_VALUE_FIELD
        ))
    }

    /// Full name of a TypeDef or TypeRef token, `None` for other tables
    fn token_type_name(&self, token: Token, max_depth: usize) -> Result<Option<String>> {
        if token.table() == TableId::TypeRef as u8 {
            Ok(Some(self.type_ref_name(token.row(), 0, max_depth)?))
        } else if token.table() == TableId::TypeDef as u8 {
            Ok(Some(self.type_def_name(token.row(), 0, max_depth)?))
        } else {
            Ok(None)
        }
    }

    fn enum_kind(&self, token: Token, max_depth: usize) -> Result<ArgumentKind> {
        let Some(name) = self.token_type_name(token, max_depth)? else {
            return Err(malformed_error!(
                "Unsupported custom attribute parameter type - {}",
                token
            ));
        };

        // Enums from other assemblies cannot be inspected, assume int32
        let underlying = if token.table() == TableId::TypeDef as u8 {
            self.enum_underlying_type(token.row())?
        } else {
            SERIALIZATION_TYPE::I4
        };

        Ok(ArgumentKind::Enum { name, underlying })
    }

    fn argument_kind(&self, signature: &TypeSignature, max_depth: usize) -> Result<ArgumentKind> {
        match signature {
            TypeSignature::Boolean => Ok(ArgumentKind::Boolean),
            TypeSignature::Char => Ok(ArgumentKind::Char),
            TypeSignature::I1 => Ok(ArgumentKind::I1),
            TypeSignature::U1 => Ok(ArgumentKind::U1),
            TypeSignature::I2 => Ok(ArgumentKind::I2),
            TypeSignature::U2 => Ok(ArgumentKind::U2),
            TypeSignature::I4 => Ok(ArgumentKind::I4),
            TypeSignature::U4 => Ok(ArgumentKind::U4),
            TypeSignature::I8 => Ok(ArgumentKind::I8),
            TypeSignature::U8 => Ok(ArgumentKind::U8),
            TypeSignature::R4 => Ok(ArgumentKind::R4),
            TypeSignature::R8 => Ok(ArgumentKind::R8),
            TypeSignature::I => Ok(ArgumentKind::I),
            TypeSignature::U => Ok(ArgumentKind::U),
            TypeSignature::String => Ok(ArgumentKind::String),
            TypeSignature::Object => Ok(ArgumentKind::Object),
            TypeSignature::SzArray(array) => Ok(ArgumentKind::SzArray(Box::new(
                self.argument_kind(&array.base, max_depth)?,
            ))),
            TypeSignature::ValueType(token) => self.enum_kind(*token, max_depth),
            TypeSignature::Class(token) => {
                match self.token_type_name(*token, max_depth)?.as_deref() {
                    Some("System.Type") => Ok(ArgumentKind::Type),
                    Some("System.String") => Ok(ArgumentKind::String),
                    Some("System.Object") => Ok(ArgumentKind::Object),
                    // Some compilers encode enum parameters as class
                    _ => self.enum_kind(*token, max_depth),
                }
            }
            other => Err(malformed_error!(
                "Unsupported custom attribute parameter type - {:?}",
                other
            )),
        }
    }

    /// Parameter kinds of the attribute constructor `constructor`
    fn constructor_parameters(
        &self,
        constructor: &CodedIndex,
        max_depth: usize,
    ) -> Result<Vec<ArgumentKind>> {
        let signature = match constructor.tag {
            TableId::MemberRef => self.member_ref(constructor.row)?.signature,
            TableId::MethodDef => self.method_def(constructor.row)?.signature,
            _ => {
                return Err(malformed_error!(
                    "Invalid custom attribute constructor - {}",
                    constructor.token
                ))
            }
        };

        let method = parse_method_signature(self.blobs.get(signature as usize)?)?;

        let mut kinds = Vec::with_capacity(method.params.len());
        for param in &method.params {
            if param.by_ref {
                return Err(malformed_error!(
                    "By-ref parameter in custom attribute constructor - {}",
                    constructor.token
                ));
            }
            kinds.push(self.argument_kind(&param.base, max_depth)?);
        }

        Ok(kinds)
    }

    fn decode_attribute(
        &self,
        constructor: &CodedIndex,
        value: u32,
        max_depth: usize,
    ) -> Result<CustomAttributeValue> {
        let blob = self.blobs.get(value as usize)?;
        if blob.is_empty() {
            return Ok(CustomAttributeValue::default());
        }

        let params = self.constructor_parameters(constructor, max_depth)?;
        parse_custom_attribute_data(blob, &params)
    }
}

/// Find the owner of `position` given the (1-based) start of each owner's list
///
/// The list of owner `i` runs up to the start of owner `i + 1`, the last list up to the end of
/// the table. Empty lists repeat the start of their successor.
fn owning_range(starts: &[u32], position: u32, list_len: u32) -> Option<u32> {
    for (index, start) in starts.iter().enumerate() {
        let end = starts.get(index + 1).copied().unwrap_or(list_len + 1);
        if *start <= position && position < end {
            return u32::try_from(index + 1).ok();
        }
    }

    None
}

#[self_referencing]
/// A loaded module and its metadata.
///
/// The view holds the file (memory mapping or buffer) for as long as it lives; dropping it
/// releases every resource. All accessors are read-only.
pub struct ModuleView {
    /// Holds the input data, either as memory buffer or memory-mapped file
    file: Arc<File>,

    #[borrows(file)]
    #[not_covariant]
    /// Holds direct references to metadata structures in the file
    data: ModuleViewData<'this>,
}

impl ModuleView {
    /// Load a module from disk, memory-mapped
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not contain valid metadata
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with(path, LoadMode::MemoryMapped)
    }

    /// Load a module from disk using `mode`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not contain valid metadata
    pub fn from_file_with(path: &Path, mode: LoadMode) -> Result<Self> {
        let file = match mode {
            LoadMode::MemoryMapped => File::from_file(path)?,
            LoadMode::Buffered => File::from_mem(fs::read(path)?)?,
        };

        Self::load(Arc::new(file))
    }

    /// Load a module from an owned buffer
    ///
    /// # Errors
    /// Returns an error if the buffer does not contain a PE image with valid metadata
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::load(Arc::new(File::from_mem(data)?))
    }

    fn load(file: Arc<File>) -> Result<Self> {
        ModuleView::try_new(file, |file| ModuleViewData::from_file(file))
    }

    /// The CLI header
    pub fn cor20header(&self) -> &Cor20Header {
        self.with_data(|data| &data.cor20header)
    }

    /// The metadata root
    pub fn metadata_root(&self) -> &Root {
        self.with_data(|data| &data.metadata_root)
    }

    /// The metadata tables
    pub fn tables(&self) -> &TablesHeader<'_> {
        self.with_data(|data| &data.tables)
    }

    /// The `#Strings` heap
    pub fn strings(&self) -> &Strings<'_> {
        self.with_data(|data| &data.strings)
    }

    /// The `#Blob` heap
    pub fn blobs(&self) -> &Blob<'_> {
        self.with_data(|data| &data.blobs)
    }

    /// The `#GUID` heap
    pub fn guids(&self) -> Option<&Guid<'_>> {
        self.with_data(|data| data.guids.as_ref())
    }

    /// The loaded file
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }

    /// Name of the module, e.g. `Acme.Core.dll`
    ///
    /// # Errors
    /// Returns an error if the Module row or its name cannot be read
    pub fn module_name(&self) -> Result<String> {
        self.with_data(|data| {
            let module = data.module()?;
            Ok(data.strings.get(module.name as usize)?.to_string())
        })
    }

    /// The module version id, `None` if the module has none
    ///
    /// # Errors
    /// Returns an error if the Module row or the `#GUID` heap cannot be read
    pub fn mvid(&self) -> Result<Option<uguid::Guid>> {
        self.with_data(|data| {
            let module = data.module()?;
            match &data.guids {
                Some(guids) if module.mvid != 0 => Ok(Some(guids.get(module.mvid as usize)?)),
                _ => Ok(None),
            }
        })
    }

    /// The Assembly row
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for modules without an Assembly row (netmodules)
    pub fn assembly(&self) -> Result<AssemblyRaw> {
        self.with_data(|data| data.assembly())
    }

    /// The custom attributes applied to the assembly, in table order
    ///
    /// ## Arguments
    /// * 'max_nesting_depth' - Bound on the nesting of attribute type names
    ///
    /// # Errors
    /// Returns an error if the module is not an assembly, if a row cannot be read, or if a type
    /// name nests deeper than `max_nesting_depth`
    pub fn assembly_attributes(
        &self,
        max_nesting_depth: usize,
    ) -> Result<Vec<AssemblyAttribute<'_>>> {
        self.with_data(|data| {
            let rows = data.assembly_attribute_rows()?;

            let mut attributes = Vec::with_capacity(rows.len());
            for row in rows {
                attributes.push(AssemblyAttribute {
                    view: self,
                    token: row.token,
                    type_name: data.attribute_type_name(&row.constructor, max_nesting_depth)?,
                    constructor: row.constructor,
                    value: row.value,
                    max_nesting_depth,
                });
            }

            Ok(attributes)
        })
    }
}

/// A custom attribute applied to the assembly.
///
/// The type name is resolved eagerly, the value blob only by [`AssemblyAttribute::value`].
pub struct AssemblyAttribute<'v> {
    view: &'v ModuleView,
    /// Token of the CustomAttribute row
    pub token: Token,
    /// Full name of the attribute type, `None` when the constructor is not declared on a
    /// TypeDef or TypeRef
    pub type_name: Option<String>,
    constructor: CodedIndex,
    value: u32,
    max_nesting_depth: usize,
}

impl AssemblyAttribute<'_> {
    /// Decode the constructor and named arguments
    ///
    /// # Errors
    /// Returns an error if the constructor signature or the value blob is malformed
    pub fn value(&self) -> Result<CustomAttributeValue> {
        self.view.with_data(|data| {
            data.decode_attribute(&self.constructor, self.value, self.max_nesting_depth)
        })
    }
}
