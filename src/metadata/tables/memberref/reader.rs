use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, MemberRefRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for MemberRefRaw {
    const TABLE_ID: TableId = TableId::MemberRef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            token: Token::from_parts(TableId::MemberRef, rid),
            offset: *offset,
            class: CodedIndex::read(data, offset, sizes, CodedIndexType::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_short() {
        let data = vec![
            0x19, 0x00, // class: TypeRef 3
            0x30, 0x00, // name
            0x40, 0x00, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MemberRef, 1), (TableId::TypeRef, 3)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<MemberRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x0A00_0001);
        assert_eq!(row.class, CodedIndex::new(TableId::TypeRef, 3));
        assert_eq!(row.name, 0x30);
        assert_eq!(row.signature, 0x40);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x1C, 0x00, 0x00, 0x00, // class: TypeSpec 3
            0x30, 0x00, 0x00, 0x00, // name
            0x40, 0x00, 0x00, 0x00, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MemberRef, 1), (TableId::TypeSpec, u16::MAX as u32 + 3)],
            true,
            true,
            true,
        ));
        let table = MetadataTable::<MemberRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.class, CodedIndex::new(TableId::TypeSpec, 3));
    }

    #[test]
    fn invalid_parent_tag() {
        // Tags 5 to 7 do not exist for MemberRefParent
        let data = vec![0x1E, 0x00, 0x30, 0x00, 0x40, 0x00];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::MemberRef, 1)], false, false, false));
        let table = MetadataTable::<MemberRefRaw>::new(&data, 1, sizes).unwrap();

        assert!(table.get(1).is_err());
        assert!(table.iter().next().unwrap().is_err());
    }
}
