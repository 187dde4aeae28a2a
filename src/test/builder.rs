//! Synthetic managed assemblies.
//!
//! [`AssemblyBuilder`] writes a minimal PE32 image with a single `.text` section that holds the
//! CLI header followed by the metadata. Only the tables needed to attach custom attributes to
//! the assembly are emitted, and every index column is two bytes wide. This file only uses
//! `std` so that integration tests and benches can include it directly.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

const FILE_ALIGNMENT: u32 = 0x200;
const SECTION_ALIGNMENT: u32 = 0x2000;
const TEXT_RVA: u32 = 0x2000;
const CLI_HEADER_SIZE: u32 = 72;
const PE_OFFSET: usize = 0x80;
const OPTIONAL_HEADER_SIZE: usize = 0xE0;

const MODULE: u8 = 0x00;
const TYPE_REF: u8 = 0x01;
const TYPE_DEF: u8 = 0x02;
const FIELD: u8 = 0x04;
const METHOD_DEF: u8 = 0x06;
const MEMBER_REF: u8 = 0x0A;
const CUSTOM_ATTRIBUTE: u8 = 0x0C;
const ASSEMBLY: u8 = 0x20;
const ASSEMBLY_REF: u8 = 0x23;
const NESTED_CLASS: u8 = 0x29;

const HASTHIS: u8 = 0x20;
const FIELD_SIG: u8 = 0x06;
const ELEMENT_VOID: u8 = 0x01;
const ELEMENT_BOOLEAN: u8 = 0x02;
const ELEMENT_I2: u8 = 0x06;
const ELEMENT_I4: u8 = 0x08;
const ELEMENT_STRING: u8 = 0x0E;
const ELEMENT_VALUETYPE: u8 = 0x11;
const ELEMENT_CLASS: u8 = 0x12;
const ELEMENT_SZARRAY: u8 = 0x1D;

const PUBLIC_CLASS: u32 = 0x0010_0001;
const PUBLIC_SEALED: u32 = 0x0000_0101;
const VISIBILITY_MASK: u32 = 0x0000_0007;
const NESTED_PUBLIC: u32 = 0x0000_0002;
const CTOR_FLAGS: u32 = 0x1886;
const ENUM_VALUE_FLAGS: u32 = 0x0606;
const ENUM_LITERAL_FLAGS: u32 = 0x8056;

/// Enum type referenced by [`TestArgument::ExternalEnum`]
pub const EXTERNAL_ENUM: &str = "Acme.Shared.Level";
/// Enum type defined by [`TestArgument::LocalEnum`]
pub const LOCAL_ENUM: &str = "Acme.Core.Mode";

/// The single constructor argument of a synthetic attribute.
#[derive(Clone, Copy, Debug)]
pub enum TestArgument {
    /// A `string` parameter
    String(&'static str),
    /// A `string` parameter passed `null`
    NullString,
    /// A `bool` parameter
    Bool(bool),
    /// An `int` parameter
    Int32(i32),
    /// A `System.Type` parameter, serialized as the type name
    Type(&'static str),
    /// A `string[]` parameter
    StringArray(&'static [&'static str]),
    /// A parameter of the int32 enum [`EXTERNAL_ENUM`] from another assembly
    ExternalEnum(i32),
    /// A parameter of the int16 enum [`LOCAL_ENUM`] defined in the assembly itself
    LocalEnum(i16),
    /// A parameterless constructor
    None,
}

#[derive(Clone, Copy, PartialEq)]
enum Target {
    Assembly,
    Module,
}

struct AttributeEntry {
    target: Target,
    type_name: String,
    local: bool,
    argument: TestArgument,
}

/// Builds the bytes of a managed assembly carrying custom attributes.
///
/// Attribute types may name nested types with `/`, e.g. `Acme.Outer/InnerAttribute`.
pub struct AssemblyBuilder {
    name: String,
    attributes: Vec<AttributeEntry>,
    with_assembly: bool,
    with_clr_header: bool,
    module_name_index: Option<u32>,
}

impl AssemblyBuilder {
    /// An assembly called `name`, version 1.0.0.0, in the module `name.dll`
    pub fn new(name: &str) -> Self {
        AssemblyBuilder {
            name: name.to_string(),
            attributes: Vec::new(),
            with_assembly: true,
            with_clr_header: true,
            module_name_index: None,
        }
    }

    /// Apply an attribute defined in another assembly to the assembly
    pub fn attribute(self, full_name: &str, argument: TestArgument) -> Self {
        self.push(Target::Assembly, full_name, false, argument)
    }

    /// Apply an attribute defined in another assembly to the module
    pub fn module_attribute(self, full_name: &str, argument: TestArgument) -> Self {
        self.push(Target::Module, full_name, false, argument)
    }

    /// Apply an attribute defined in this assembly to the assembly
    pub fn local_attribute(self, full_name: &str, argument: TestArgument) -> Self {
        self.push(Target::Assembly, full_name, true, argument)
    }

    /// Omit the Assembly row, producing a netmodule
    pub fn without_assembly(mut self) -> Self {
        self.with_assembly = false;
        self
    }

    /// Leave the CLR runtime header data directory empty, producing a native image
    pub fn without_clr_header(mut self) -> Self {
        self.with_clr_header = false;
        self
    }

    /// Point the name of the Module row at `index` instead of the module name
    pub fn module_name_index(mut self, index: u32) -> Self {
        self.module_name_index = Some(index);
        self
    }

    fn push(mut self, target: Target, full_name: &str, local: bool, argument: TestArgument) -> Self {
        self.attributes.push(AttributeEntry {
            target,
            type_name: full_name.to_string(),
            local,
            argument,
        });
        self
    }

    /// The complete PE image
    pub fn build(&self) -> Vec<u8> {
        let metadata = self.metadata();

        let mut text = cli_header(len_u32(&metadata));
        text.extend_from_slice(&metadata);

        self.image(&text)
    }

    fn metadata(&self) -> Vec<u8> {
        let mut tables = Tables::new(&self.name);
        for entry in &self.attributes {
            tables.add_attribute(entry);
        }
        if let Some(index) = self.module_name_index {
            tables.module_name = index;
        }

        let mut guid = [0u8; 16];
        for (index, byte) in self.name.bytes().enumerate() {
            guid[index % 16] ^= byte.rotate_left((index % 8) as u32);
        }
        guid[7] = (guid[7] & 0x0F) | 0x40;
        guid[8] = (guid[8] & 0x3F) | 0x80;

        let streams = [
            ("#~", tables.write(self.with_assembly)),
            ("#Strings", tables.strings.clone()),
            ("#US", vec![0]),
            ("#GUID", guid.to_vec()),
            ("#Blob", tables.blobs.clone()),
        ];

        metadata_root(&streams)
    }

    fn image(&self, text: &[u8]) -> Vec<u8> {
        let raw_size = align(len_u32(text), FILE_ALIGNMENT);
        let mut image = vec![0u8; (FILE_ALIGNMENT + raw_size) as usize];

        // DOS header
        image[..2].copy_from_slice(b"MZ");
        put_u16(&mut image, 0x02, 0x90);
        put_u16(&mut image, 0x04, 0x03);
        put_u16(&mut image, 0x08, 0x04);
        put_u16(&mut image, 0x0C, 0xFFFF);
        put_u16(&mut image, 0x10, 0xB8);
        put_u16(&mut image, 0x18, 0x40);
        put_u32(&mut image, 0x3C, PE_OFFSET as u32);
        image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");

        // COFF header: i386, one section, executable 32-bit dll
        let coff = PE_OFFSET + 4;
        put_u16(&mut image, coff, 0x014C);
        put_u16(&mut image, coff + 2, 1);
        put_u16(&mut image, coff + 16, OPTIONAL_HEADER_SIZE as u16);
        put_u16(&mut image, coff + 18, 0x2102);

        // PE32 optional header
        let optional = coff + 20;
        put_u16(&mut image, optional, 0x010B);
        image[optional + 2] = 48;
        put_u32(&mut image, optional + 4, raw_size);
        put_u32(&mut image, optional + 20, TEXT_RVA);
        put_u32(&mut image, optional + 28, 0x0040_0000);
        put_u32(&mut image, optional + 32, SECTION_ALIGNMENT);
        put_u32(&mut image, optional + 36, FILE_ALIGNMENT);
        put_u16(&mut image, optional + 40, 4);
        put_u16(&mut image, optional + 48, 4);
        put_u32(
            &mut image,
            optional + 56,
            TEXT_RVA + align(len_u32(text), SECTION_ALIGNMENT),
        );
        put_u32(&mut image, optional + 60, FILE_ALIGNMENT);
        put_u16(&mut image, optional + 68, 3);
        put_u16(&mut image, optional + 70, 0x8540);
        put_u32(&mut image, optional + 72, 0x0010_0000);
        put_u32(&mut image, optional + 76, 0x1000);
        put_u32(&mut image, optional + 80, 0x0010_0000);
        put_u32(&mut image, optional + 84, 0x1000);
        put_u32(&mut image, optional + 92, 16);

        if self.with_clr_header {
            let clr_directory = optional + 96 + 14 * 8;
            put_u32(&mut image, clr_directory, TEXT_RVA);
            put_u32(&mut image, clr_directory + 4, CLI_HEADER_SIZE);
        }

        let section = optional + OPTIONAL_HEADER_SIZE;
        image[section..section + 5].copy_from_slice(b".text");
        put_u32(&mut image, section + 8, len_u32(text));
        put_u32(&mut image, section + 12, TEXT_RVA);
        put_u32(&mut image, section + 16, raw_size);
        put_u32(&mut image, section + 20, FILE_ALIGNMENT);
        put_u32(&mut image, section + 36, 0x6000_0020);

        let start = FILE_ALIGNMENT as usize;
        image[start..start + text.len()].copy_from_slice(text);
        image
    }
}

struct TypeDefRow {
    flags: u32,
    name: u32,
    namespace: u32,
    extends: u32,
    enclosing: Option<u32>,
    fields: Vec<FieldRow>,
    methods: Vec<MethodRow>,
}

struct FieldRow {
    flags: u32,
    name: u32,
    signature: u32,
}

struct MethodRow {
    signature: Vec<u8>,
    blob: u32,
}

enum Constructor {
    MemberRef(u32),
    MethodDef { type_def: usize, method: usize },
}

struct AttributeRow {
    parent: u32,
    constructor: Constructor,
    value: u32,
}

/// Rows and heaps of the metadata under construction
#[derive(Default)]
struct Tables {
    strings: Vec<u8>,
    string_offsets: HashMap<String, u32>,
    blobs: Vec<u8>,
    module_name: u32,
    assembly_name: u32,
    ctor_name: u32,
    assembly_refs: Vec<(u32, u32)>,
    type_refs: Vec<(u32, u32, u32)>,
    type_ref_rids: HashMap<String, u32>,
    type_defs: Vec<TypeDefRow>,
    type_def_rids: HashMap<String, u32>,
    member_refs: Vec<(u32, u32)>,
    member_ref_rids: HashMap<(u32, Vec<u8>), u32>,
    attributes: Vec<AttributeRow>,
}

impl Tables {
    fn new(name: &str) -> Self {
        let mut tables = Tables {
            strings: vec![0],
            blobs: vec![0],
            ..Tables::default()
        };

        tables.module_name = tables.string(&format!("{name}.dll"));
        tables.assembly_name = tables.string(name);
        tables.ctor_name = tables.string(".ctor");

        let runtime = tables.string("System.Runtime");
        let shared = tables.string("Acme.Shared");
        tables.assembly_refs = vec![(8, runtime), (1, shared)];

        let module_type = tables.string("<Module>");
        tables.type_defs.push(TypeDefRow {
            flags: 0,
            name: module_type,
            namespace: 0,
            extends: 0,
            enclosing: None,
            fields: Vec::new(),
            methods: Vec::new(),
        });

        tables
    }

    fn string(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.string_offsets.get(value) {
            return *offset;
        }

        let offset = len_u32(&self.strings);
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_offsets.insert(value.to_string(), offset);
        offset
    }

    fn blob(&mut self, value: &[u8]) -> u32 {
        let offset = len_u32(&self.blobs);
        compressed(&mut self.blobs, len_u32(value));
        self.blobs.extend_from_slice(value);
        offset
    }

    /// Row of the TypeRef `path`, scoped to a TypeRef for nested names
    fn type_ref(&mut self, path: &str) -> u32 {
        if let Some(rid) = self.type_ref_rids.get(path) {
            return *rid;
        }

        let (scope, namespace, name) = match path.rsplit_once('/') {
            Some((outer, name)) => ((self.type_ref(outer) << 2) | 3, "", name),
            None => {
                let (namespace, name) = split_name(path);
                let assembly_ref = if namespace.starts_with("System") { 1 } else { 2 };
                ((assembly_ref << 2) | 2, namespace, name)
            }
        };

        let row = (scope, self.string(name), self.string(namespace));
        self.type_refs.push(row);

        let rid = len_u32(&self.type_refs);
        self.type_ref_rids.insert(path.to_string(), rid);
        rid
    }

    /// `TypeDefOrRef` coded index of the TypeRef `path`
    fn type_ref_coded(&mut self, path: &str) -> u32 {
        (self.type_ref(path) << 2) | 1
    }

    /// Row of the TypeDef `path`; enclosing types are created as plain classes
    fn type_def(&mut self, path: &str, flags: u32, extends: u32) -> u32 {
        if let Some(rid) = self.type_def_rids.get(path) {
            return *rid;
        }

        let (enclosing, namespace, name, flags) = match path.rsplit_once('/') {
            Some((outer, name)) => {
                let object = self.type_ref_coded("System.Object");
                let enclosing = self.type_def(outer, PUBLIC_CLASS, object);
                (
                    Some(enclosing),
                    "",
                    name,
                    (flags & !VISIBILITY_MASK) | NESTED_PUBLIC,
                )
            }
            None => {
                let (namespace, name) = split_name(path);
                (None, namespace, name, flags)
            }
        };

        let row = TypeDefRow {
            flags,
            name: self.string(name),
            namespace: self.string(namespace),
            extends,
            enclosing,
            fields: Vec::new(),
            methods: Vec::new(),
        };
        self.type_defs.push(row);

        let rid = len_u32(&self.type_defs);
        self.type_def_rids.insert(path.to_string(), rid);
        rid
    }

    /// The int16 enum [`LOCAL_ENUM`] with its `value__` field and one literal
    fn local_enum(&mut self) -> u32 {
        if let Some(rid) = self.type_def_rids.get(LOCAL_ENUM) {
            return *rid;
        }

        let extends = self.type_ref_coded("System.Enum");
        let rid = self.type_def(LOCAL_ENUM, PUBLIC_SEALED, extends);

        let value_field = FieldRow {
            flags: ENUM_VALUE_FLAGS,
            name: self.string("value__"),
            signature: self.blob(&[FIELD_SIG, ELEMENT_I2]),
        };

        let mut literal_signature = vec![FIELD_SIG, ELEMENT_VALUETYPE];
        compressed(&mut literal_signature, rid << 2);
        let literal_field = FieldRow {
            flags: ENUM_LITERAL_FLAGS,
            name: self.string("Fast"),
            signature: self.blob(&literal_signature),
        };

        let fields = &mut self.type_defs[rid as usize - 1].fields;
        fields.push(value_field);
        fields.push(literal_field);
        rid
    }

    fn ctor_signature(&mut self, argument: TestArgument) -> Vec<u8> {
        let count = u8::from(!matches!(argument, TestArgument::None));
        let mut signature = vec![HASTHIS, count, ELEMENT_VOID];

        match argument {
            TestArgument::String(_) | TestArgument::NullString => signature.push(ELEMENT_STRING),
            TestArgument::Bool(_) => signature.push(ELEMENT_BOOLEAN),
            TestArgument::Int32(_) => signature.push(ELEMENT_I4),
            TestArgument::Type(_) => {
                signature.push(ELEMENT_CLASS);
                let system_type = self.type_ref_coded("System.Type");
                compressed(&mut signature, system_type);
            }
            TestArgument::StringArray(_) => {
                signature.extend_from_slice(&[ELEMENT_SZARRAY, ELEMENT_STRING]);
            }
            TestArgument::ExternalEnum(_) => {
                signature.push(ELEMENT_VALUETYPE);
                let level = self.type_ref_coded(EXTERNAL_ENUM);
                compressed(&mut signature, level);
            }
            TestArgument::LocalEnum(_) => {
                signature.push(ELEMENT_VALUETYPE);
                let mode = self.local_enum();
                compressed(&mut signature, mode << 2);
            }
            TestArgument::None => {}
        }

        signature
    }

    fn add_attribute(&mut self, entry: &AttributeEntry) {
        let signature = self.ctor_signature(entry.argument);

        let constructor = if entry.local {
            let extends = self.type_ref_coded("System.Attribute");
            let type_def = self.type_def(&entry.type_name, PUBLIC_CLASS, extends) as usize - 1;

            let existing = self.type_defs[type_def]
                .methods
                .iter()
                .position(|method| method.signature == signature);
            let method = match existing {
                Some(method) => method,
                None => {
                    let blob = self.blob(&signature);
                    let methods = &mut self.type_defs[type_def].methods;
                    methods.push(MethodRow { signature, blob });
                    methods.len() - 1
                }
            };

            Constructor::MethodDef { type_def, method }
        } else {
            let class = self.type_ref(&entry.type_name);
            let key = (class, signature);
            let rid = match self.member_ref_rids.get(&key) {
                Some(rid) => *rid,
                None => {
                    let blob = self.blob(&key.1);
                    self.member_refs.push((class, blob));
                    let rid = len_u32(&self.member_refs);
                    self.member_ref_rids.insert(key, rid);
                    rid
                }
            };

            Constructor::MemberRef(rid)
        };

        let value = self.blob(&value_blob(entry.argument));
        let parent = match entry.target {
            Target::Assembly => (1 << 5) | 14,
            Target::Module => (1 << 5) | 7,
        };

        self.attributes.push(AttributeRow {
            parent,
            constructor,
            value,
        });
    }

    /// The `#~` stream
    fn write(&self, with_assembly: bool) -> Vec<u8> {
        let mut tables: BTreeMap<u8, Table> = BTreeMap::new();

        tables
            .entry(MODULE)
            .or_default()
            .u16(0)
            .u16(self.module_name)
            .u16(1)
            .u16(0)
            .u16(0)
            .end_row();

        for (scope, name, namespace) in &self.type_refs {
            tables
                .entry(TYPE_REF)
                .or_default()
                .u16(*scope)
                .u16(*name)
                .u16(*namespace)
                .end_row();
        }

        // Field and method lists follow TypeDef order
        let mut next_field = 1;
        let mut next_method = 1;
        let mut method_bases = Vec::with_capacity(self.type_defs.len());
        for type_def in &self.type_defs {
            method_bases.push(next_method);
            tables
                .entry(TYPE_DEF)
                .or_default()
                .u32(type_def.flags)
                .u16(type_def.name)
                .u16(type_def.namespace)
                .u16(type_def.extends)
                .u16(next_field)
                .u16(next_method)
                .end_row();

            for field in &type_def.fields {
                tables
                    .entry(FIELD)
                    .or_default()
                    .u16(field.flags)
                    .u16(field.name)
                    .u16(field.signature)
                    .end_row();
            }
            for method in &type_def.methods {
                tables
                    .entry(METHOD_DEF)
                    .or_default()
                    .u32(0)
                    .u16(0)
                    .u16(CTOR_FLAGS)
                    .u16(self.ctor_name)
                    .u16(method.blob)
                    .u16(1)
                    .end_row();
            }

            next_field += len_u32(&type_def.fields);
            next_method += len_u32(&type_def.methods);
        }

        for (class, signature) in &self.member_refs {
            tables
                .entry(MEMBER_REF)
                .or_default()
                .u16((class << 3) | 1)
                .u16(self.ctor_name)
                .u16(*signature)
                .end_row();
        }

        let mut attributes: Vec<(u32, u32, u32)> = self
            .attributes
            .iter()
            .map(|attribute| {
                let constructor = match attribute.constructor {
                    Constructor::MemberRef(rid) => (rid << 3) | 3,
                    Constructor::MethodDef { type_def, method } => {
                        let rid = method_bases[type_def] + method as u32;
                        (rid << 3) | 2
                    }
                };
                (attribute.parent, constructor, attribute.value)
            })
            .collect();
        attributes.sort_by_key(|(parent, _, _)| *parent);
        for (parent, constructor, value) in attributes {
            tables
                .entry(CUSTOM_ATTRIBUTE)
                .or_default()
                .u16(parent)
                .u16(constructor)
                .u16(value)
                .end_row();
        }

        if with_assembly {
            tables
                .entry(ASSEMBLY)
                .or_default()
                .u32(0x8004)
                .u16(1)
                .u16(0)
                .u16(0)
                .u16(0)
                .u32(0)
                .u16(0)
                .u16(self.assembly_name)
                .u16(0)
                .end_row();
        }

        for (major, name) in &self.assembly_refs {
            tables
                .entry(ASSEMBLY_REF)
                .or_default()
                .u16(*major)
                .u16(0)
                .u16(0)
                .u16(0)
                .u32(0)
                .u16(0)
                .u16(*name)
                .u16(0)
                .u16(0)
                .end_row();
        }

        for (index, type_def) in self.type_defs.iter().enumerate() {
            if let Some(enclosing) = type_def.enclosing {
                tables
                    .entry(NESTED_CLASS)
                    .or_default()
                    .u16(index as u32 + 1)
                    .u16(enclosing)
                    .end_row();
            }
        }

        let valid = tables.keys().fold(0u64, |valid, id| valid | (1 << id));
        let sorted = valid & ((1 << CUSTOM_ATTRIBUTE) | (1 << NESTED_CLASS));

        // Reserved, schema 2.0, small heaps, reserved
        let mut stream = vec![0, 0, 0, 0, 2, 0, 0, 1];
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&sorted.to_le_bytes());
        for table in tables.values() {
            stream.extend_from_slice(&table.rows.to_le_bytes());
        }
        for table in tables.values() {
            stream.extend_from_slice(&table.data);
        }

        stream
    }
}

#[derive(Default)]
struct Table {
    rows: u32,
    data: Vec<u8>,
}

impl Table {
    fn u16(&mut self, value: u32) -> &mut Self {
        let value = u16::try_from(value).expect("value exceeds a two byte column");
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn end_row(&mut self) {
        self.rows += 1;
    }
}

fn value_blob(argument: TestArgument) -> Vec<u8> {
    let mut value = vec![0x01, 0x00];

    match argument {
        TestArgument::String(text) | TestArgument::Type(text) => serialized_string(&mut value, text),
        TestArgument::NullString => value.push(0xFF),
        TestArgument::Bool(flag) => value.push(u8::from(flag)),
        TestArgument::Int32(number) | TestArgument::ExternalEnum(number) => {
            value.extend_from_slice(&number.to_le_bytes());
        }
        TestArgument::LocalEnum(number) => value.extend_from_slice(&number.to_le_bytes()),
        TestArgument::StringArray(items) => {
            value.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                serialized_string(&mut value, item);
            }
        }
        TestArgument::None => {}
    }

    // No named arguments
    value.extend_from_slice(&[0x00, 0x00]);
    value
}

fn cli_header(metadata_size: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(CLI_HEADER_SIZE as usize);
    header.extend_from_slice(&CLI_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&2u16.to_le_bytes());
    header.extend_from_slice(&5u16.to_le_bytes());
    header.extend_from_slice(&(TEXT_RVA + CLI_HEADER_SIZE).to_le_bytes());
    header.extend_from_slice(&metadata_size.to_le_bytes());
    // IL only, no entry point, no other directories
    header.extend_from_slice(&1u32.to_le_bytes());
    header.resize(CLI_HEADER_SIZE as usize, 0);
    header
}

fn metadata_root(streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let version = b"v4.0.30319\0\0";
    let headers_size: usize = streams
        .iter()
        .map(|(name, _)| 8 + padded(name.len() + 1))
        .sum();

    let mut root = Vec::new();
    root.extend_from_slice(b"BSJB");
    root.extend_from_slice(&1u16.to_le_bytes());
    root.extend_from_slice(&1u16.to_le_bytes());
    root.extend_from_slice(&0u32.to_le_bytes());
    root.extend_from_slice(&len_u32(version).to_le_bytes());
    root.extend_from_slice(version);
    root.extend_from_slice(&0u16.to_le_bytes());
    root.extend_from_slice(&(streams.len() as u16).to_le_bytes());

    let mut offset = root.len() + headers_size;
    for (name, data) in streams {
        let size = padded(data.len());
        root.extend_from_slice(&(offset as u32).to_le_bytes());
        root.extend_from_slice(&(size as u32).to_le_bytes());

        let mut name = name.as_bytes().to_vec();
        name.resize(padded(name.len() + 1), 0);
        root.extend_from_slice(&name);

        offset += size;
    }

    for (_, data) in streams {
        root.extend_from_slice(data);
        root.resize(padded(root.len()), 0);
    }

    root
}

fn split_name(full_name: &str) -> (&str, &str) {
    full_name.rsplit_once('.').unwrap_or(("", full_name))
}

fn serialized_string(out: &mut Vec<u8>, value: &str) {
    compressed(out, len_u32(value.as_bytes()));
    out.extend_from_slice(value.as_bytes());
}

fn compressed(out: &mut Vec<u8>, value: u32) {
    if value < 0x80 {
        out.push(value as u8);
    } else if value < 0x4000 {
        out.extend_from_slice(&(value as u16 | 0x8000).to_be_bytes());
    } else {
        out.extend_from_slice(&(value | 0xC000_0000).to_be_bytes());
    }
}

fn len_u32<T>(items: &[T]) -> u32 {
    u32::try_from(items.len()).expect("test image exceeds 4GB")
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn align(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

fn put_u16(image: &mut [u8], offset: usize, value: u16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
