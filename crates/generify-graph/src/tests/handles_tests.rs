use super::*;

#[derive(Default)]
struct TypeTable {
    types: Vec<TypeDecl>,
}

struct TypeDecl {
    key: String,
    name: String,
    flags: TypeFlags,
    params: u32,
    supers: Vec<usize>,
}

impl TypeTable {
    fn add(&mut self, key: &str, flags: TypeFlags, params: u32, supers: &[usize]) -> usize {
        let name = key.rsplit('.').next().unwrap_or(key).to_string();
        self.types.push(TypeDecl {
            key: key.to_string(),
            name,
            flags,
            params,
            supers: supers.to_vec(),
        });
        self.types.len() - 1
    }
}

impl TypeProvider for TypeTable {
    type Ty = usize;

    fn key(&self, ty: usize) -> &str {
        &self.types[ty].key
    }

    fn name(&self, ty: usize) -> &str {
        &self.types[ty].name
    }

    fn flags(&self, ty: usize) -> TypeFlags {
        self.types[ty].flags
    }

    fn type_parameter_count(&self, ty: usize) -> u32 {
        self.types[ty].params
    }

    fn direct_supertypes(&self, ty: usize) -> Vec<usize> {
        self.types[ty].supers.clone()
    }
}

/// Object, Collection (container root), List, ArrayList, String, int.
fn java_base() -> (TypeTable, [usize; 6]) {
    let mut table = TypeTable::default();
    let object = table.add("java.lang.Object", TypeFlags::empty(), 0, &[]);
    let collection = table.add(
        "java.util.Collection",
        TypeFlags::CONTAINER_ROOT,
        1,
        &[object],
    );
    let list = table.add("java.util.List", TypeFlags::empty(), 1, &[collection]);
    let array_list = table.add("java.util.ArrayList", TypeFlags::empty(), 1, &[list]);
    let string = table.add("java.lang.String", TypeFlags::empty(), 0, &[object]);
    let int = table.add("int", TypeFlags::PRIMITIVE, 0, &[]);
    (table, [object, collection, list, array_list, string, int])
}

#[test]
fn test_handles_are_memoized() {
    let (table, [_, collection, list, ..]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h1 = factory.get_handle(&mut interner, &table, list);
    let h2 = factory.get_handle(&mut interner, &table, list);
    let h3 = factory.get_handle(&mut interner, &table, collection);

    assert_eq!(h1, h2);
    assert_ne!(h1, h3);
    // Resolving List created its whole supertype chain.
    assert_eq!(factory.len(), 3);
}

#[test]
fn test_supertypes_resolved_before_insert() {
    let (table, [object, collection, list, ..]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_list = factory.get_handle(&mut interner, &table, list);
    let h_collection = factory.get_handle(&mut interner, &table, collection);
    let h_object = factory.get_handle(&mut interner, &table, object);

    assert_eq!(factory.direct_supertypes(h_list), &[h_collection]);
    assert_eq!(factory.direct_supertypes(h_collection), &[h_object]);
    assert!(factory.direct_supertypes(h_object).is_empty());
}

#[test]
fn test_duplicate_key_across_bindings_collapses() {
    // Two distinct resolver bindings share the key "p.A"; resolving the
    // first reaches the second through a supertype, so the factory re-checks
    // the memo after recursion instead of inserting a duplicate handle.
    let mut table = TypeTable::default();
    let a_again = 2usize;
    let a = table.add("p.A", TypeFlags::empty(), 0, &[1]);
    let b = table.add("p.B", TypeFlags::empty(), 0, &[a_again]);
    let other_a = table.add("p.A", TypeFlags::empty(), 0, &[]);

    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_a = factory.get_handle(&mut interner, &table, a);
    let h_other = factory.get_handle(&mut interner, &table, other_a);
    let h_b = factory.get_handle(&mut interner, &table, b);

    assert_eq!(h_a, h_other);
    assert_eq!(factory.len(), 2);
    assert_eq!(factory.direct_supertypes(h_b), &[h_a]);
}

#[test]
fn test_assignability_walks_the_lattice() {
    let (table, [object, collection, _, array_list, string, _]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_array_list = factory.get_handle(&mut interner, &table, array_list);
    let h_collection = factory.get_handle(&mut interner, &table, collection);
    let h_object = factory.get_handle(&mut interner, &table, object);
    let h_string = factory.get_handle(&mut interner, &table, string);

    assert!(factory.is_assignable_to(h_array_list, h_array_list));
    assert!(factory.is_assignable_to(h_array_list, h_collection));
    assert!(factory.is_assignable_to(h_array_list, h_object));
    assert!(!factory.is_assignable_to(h_collection, h_array_list));
    assert!(!factory.is_assignable_to(h_string, h_collection));
}

#[test]
fn test_container_roots_from_flags() {
    let (table, [_, collection, list, array_list, string, _]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_array_list = factory.get_handle(&mut interner, &table, array_list);
    let h_list = factory.get_handle(&mut interner, &table, list);
    let h_collection = factory.get_handle(&mut interner, &table, collection);
    let h_string = factory.get_handle(&mut interner, &table, string);

    assert_eq!(factory.container_roots(), &[h_collection]);
    assert!(factory.is_container_like(h_collection));
    assert!(factory.is_container_like(h_list));
    assert!(factory.is_container_like(h_array_list));
    assert!(!factory.is_container_like(h_string));
}

#[test]
fn test_mark_container_root_is_idempotent() {
    let (table, [object, ..]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_object = factory.get_handle(&mut interner, &table, object);
    factory.mark_container_root(h_object);
    factory.mark_container_root(h_object);

    assert_eq!(factory.container_roots(), &[h_object]);
}

#[test]
fn test_primitive_flags_survive() {
    let (table, [.., int]) = java_base();
    let mut interner = Interner::new();
    let mut factory = TypeHandleFactory::new();

    let h_int = factory.get_handle(&mut interner, &table, int);
    assert!(factory.flags(h_int).is_rejected());
}
