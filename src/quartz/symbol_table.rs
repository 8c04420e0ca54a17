use log::*;

// Enum for the type of a value in the language. Error is the sentinel the
// semantic analyzer annotates a node with when it cannot infer a real type,
// so downstream consumers never see a missing annotation.
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum (serialize_all = "lowercase")]
pub enum Type {
    Integer,
    Real,
    Boolean,
    Char,
    String,
    Error
}

// Enum for how a value is accessed at evaluation time
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum (serialize_all = "lowercase")]
pub enum AddressingMode {
    Immediate,
    Direct,
    Register
}

// A declared identifier in the variable symbol table
#[derive (Debug, Clone, PartialEq)]
pub struct Symbol {
    // The id the lexer stamps on identifier tokens
    pub id: u32,
    pub name: String,
    pub symbol_type: Type,
    pub scope: u32,
    // Synthetic RAM address assigned at declaration time
    pub address: u32,
    pub mode: AddressingMode,
    // Literal value, when the caller pre-seeds one
    pub value: Option<String>
}

// Base RAM address for the first declared symbol
const ADDRESS_BASE: u32 = 0x1000;
// Every symbol takes one 4-byte slot
const ADDRESS_STRIDE: u32 = 4;
// Symbol ids live in their own range so they never collide with the fixed tables
const ID_BASE: u32 = 10000;

#[derive (Debug)]
pub struct SymbolTable {
    // Declaration-ordered entries, unique per (name, scope)
    entries: Vec<Symbol>,

    // The next address to hand out
    address_counter: u32
}

impl SymbolTable {
    // Constructor for a new symbol table
    pub fn new() -> Self {
        return SymbolTable {
            entries: Vec::new(),
            address_counter: ADDRESS_BASE
        };
    }

    // Declares an identifier and returns its id. Declaring a (name, scope)
    // pair that already exists silently re-uses the original entry, so no
    // address is burned and no duplicate-declaration error is raised.
    pub fn declare(&mut self, name: &str, symbol_type: Type, scope: u32) -> u32 {
        if let Some(existing) = self.entries.iter().find(|sym| sym.name == name && sym.scope == scope) {
            return existing.id;
        }

        let new_symbol: Symbol = Symbol {
            id: ID_BASE + self.entries.len() as u32,
            name: String::from(name),
            symbol_type,
            scope,
            address: self.address_counter,
            mode: AddressingMode::Direct,
            value: None
        };
        debug!("Declared symbol {:?}", new_symbol);

        self.address_counter += ADDRESS_STRIDE;
        self.entries.push(new_symbol);

        return self.entries.last().unwrap().id;
    }

    // Looks a symbol up by name
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        return self.entries.iter().find(|sym| sym.name == name);
    }

    // All entries, in declaration order
    pub fn entries(&self) -> &[Symbol] {
        return &self.entries;
    }

    // The next address that would be handed out
    pub fn next_address(&self) -> u32 {
        return self.address_counter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_assigned_in_declaration_order() {
        let mut table: SymbolTable = SymbolTable::new();
        table.declare("a", Type::Integer, 0);
        table.declare("b", Type::Real, 0);

        assert_eq!(table.lookup("a").unwrap().address, 0x1000);
        assert_eq!(table.lookup("b").unwrap().address, 0x1004);
        assert_eq!(table.next_address(), 0x1008);
    }

    #[test]
    fn redeclaring_reuses_the_entry() {
        let mut table: SymbolTable = SymbolTable::new();
        let first: u32 = table.declare("a", Type::Integer, 0);
        let second: u32 = table.declare("a", Type::Real, 0);

        // Same entry, same address, and the original type wins
        assert_eq!(first, second);
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.lookup("a").unwrap().symbol_type, Type::Integer);
        assert_eq!(table.next_address(), 0x1004);
    }

    #[test]
    fn same_name_in_another_scope_is_a_new_symbol() {
        let mut table: SymbolTable = SymbolTable::new();
        let outer: u32 = table.declare("a", Type::Integer, 0);
        let inner: u32 = table.declare("a", Type::Integer, 1);

        assert_ne!(outer, inner);
        assert_eq!(table.entries().len(), 2);
    }
}
