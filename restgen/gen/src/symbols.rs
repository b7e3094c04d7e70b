//! Named-field structs visible to the run, for composite query parameters.

use std::collections::HashMap;

use restgen_define::Marker;
use syn::ext::IdentExt;
use syn::{Attribute, Fields, Item, ItemStruct, LitStr, Visibility};

use crate::source::SourceUnit;

/// A public field of a struct and the query key it produces.
///
/// Symbols hold plain strings so the table can be shared with worker
/// threads; syn identifiers cannot cross threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSymbol {
    /// Field identifier as written (`r#type` keeps its prefix).
    pub field: String,
    /// Query key: the `#[alias]` value, else the field name.
    pub key: String,
}

/// A named-field struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSymbol {
    /// Public fields in declaration order.
    pub fields: Vec<FieldSymbol>,
}

/// Every named-field struct of the run, keyed by qualified path
/// (`crate::module::Name`).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    structs: HashMap<Vec<String>, StructSymbol>,
}

impl SymbolTable {
    /// Collects structs from every unit, inline modules included.
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut table = Self::default();
        for unit in units {
            table.collect(&unit.module, &unit.file.items);
        }
        table
    }

    fn collect(&mut self, module: &[String], items: &[Item]) {
        for item in items {
            match item {
                Item::Struct(item_struct) => {
                    if let Some(symbol) = struct_symbol(item_struct) {
                        let key = std::iter::once("crate".to_string())
                            .chain(module.iter().cloned())
                            .chain(std::iter::once(item_struct.ident.to_string()))
                            .collect();
                        self.structs.insert(key, symbol);
                    }
                }
                Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        let mut inner = module.to_vec();
                        inner.push(item_mod.ident.to_string());
                        self.collect(&inner, nested);
                    }
                }
                _ => {}
            }
        }
    }

    /// Looks up a struct by qualified path.
    pub fn get(&self, path: &[String]) -> Option<&StructSymbol> {
        self.structs.get(path)
    }

    /// Returns the first candidate path that names a known struct.
    pub fn find<'a>(&'a self, candidates: &[Vec<String>]) -> Option<&'a StructSymbol> {
        candidates.iter().find_map(|path| self.get(path))
    }

    /// Number of known structs.
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    /// Returns `true` if no struct is known.
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

fn struct_symbol(item: &ItemStruct) -> Option<StructSymbol> {
    let Fields::Named(named) = &item.fields else {
        return None;
    };

    let fields = named
        .named
        .iter()
        .filter(|field| !matches!(field.vis, Visibility::Inherited))
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let key = field
                .attrs
                .iter()
                .find_map(alias_literal)
                .unwrap_or_else(|| ident.unraw().to_string());
            Some(FieldSymbol {
                field: ident.to_string(),
                key,
            })
        })
        .collect();

    Some(StructSymbol { fields })
}

/// Returns the value of an `#[alias("..")]` helper, if `attr` is one.
pub fn alias_literal(attr: &Attribute) -> Option<String> {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    let marker = match segments.as_slice() {
        [single] => Marker::from_name(single),
        qualified => Marker::from_qualified(qualified),
    };
    if marker != Some(Marker::Alias) {
        return None;
    }
    attr.parse_args::<LitStr>().ok().map(|lit| lit.value())
}
