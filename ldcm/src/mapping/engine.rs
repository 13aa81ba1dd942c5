//! Recursive record walk.
//!
//! # Invariants
//!
//! - Every fact goes through the `GraphStore`; the engine holds no graph
//!   state of its own between records.
//! - Each ancestor class is descended into at most once per root, so a
//!   cyclic containment declaration in the schema terminates.
//! - Sequence container and item identities are `<owner>_<tag>` and
//!   `<container>_<index>`. They are positional: the same item at another
//!   index in a later record is a different entity.

use std::collections::HashSet;

use super::{CONTENT_URL, ENCODING_FORMAT, MappingError, MappingOptions, RecordSource};
use crate::schema::{AncestorRelation, PropertyKind, SchemaService};
use crate::store::{GraphFormat, GraphStore};
use crate::types::{AttributeTree, ClassIri, Element, ElementValue, EntityId, PropertyIri};

/// Maps attribute trees into a graph store using a schema.
pub struct MappingEngine<'s, S: SchemaService + ?Sized> {
    schema: &'s S,
    options: MappingOptions,
}

impl<'s, S: SchemaService + ?Sized> MappingEngine<'s, S> {
    /// Create an engine with default options.
    #[must_use]
    pub fn new(schema: &'s S) -> Self {
        Self::with_options(schema, MappingOptions::default())
    }

    #[must_use]
    pub const fn with_options(schema: &'s S, options: MappingOptions) -> Self {
        Self { schema, options }
    }

    #[must_use]
    pub const fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Map one record into `store` and return its root entity.
    ///
    /// # Pre-conditions
    ///
    /// - `tree` is flat with respect to keys: the key of the root entity and
    ///   of every ancestor is a top-level attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the type code or a required key is missing from
    /// the record, if the root class has no key, or if the store rejects a
    /// write. A failed record leaves no facts behind.
    pub fn map_record(
        &self,
        store: &mut GraphStore,
        tree: &AttributeTree,
        source: Option<&RecordSource>,
    ) -> Result<EntityId, MappingError> {
        store.atomically(|store| self.map_into(store, tree, source))
    }

    fn map_into(
        &self,
        store: &mut GraphStore,
        tree: &AttributeTree,
        source: Option<&RecordSource>,
    ) -> Result<EntityId, MappingError> {
        let type_code_tag = self.options.type_code_tag;
        let type_code = tree
            .get(type_code_tag)
            .and_then(Element::as_text)
            .ok_or(MappingError::MissingAttribute { tag: type_code_tag })?;

        let root_class = self.schema.class_for_type_code(type_code);
        let key = self
            .schema
            .key_property(&root_class)
            .ok_or_else(|| MappingError::MissingKeyProperty(root_class.clone()))?;
        let key_value = self.key_value(tree, &key)?;
        let root = store.create_or_get_instance(&root_class, key_value, Some(&key))?;

        let mut visited = HashSet::from([root_class.clone()]);
        self.create_parent_instances(store, tree, &root, &root_class, &mut visited)?;

        if let Some(source) = source.filter(|_| self.options.persistent_storage) {
            let location = source.location.display().to_string();
            store.add_literal_fact(&root, &PropertyIri::new(CONTENT_URL), &location)?;
            store.add_literal_fact(
                &root,
                &PropertyIri::new(ENCODING_FORMAT),
                &source.encoding_format,
            )?;
        }

        for element in tree {
            if element.is_sequence() {
                self.parse_sequence(store, tree, element, &root)?;
            } else {
                self.parse_element(store, tree, element, None)?;
            }
        }

        tracing::debug!("mapped record {root} as {root_class}");
        Ok(root)
    }

    /// Map one record into a fresh store and return it as N-Triples.
    ///
    /// # Errors
    ///
    /// Returns an error if mapping or serialization fails.
    pub fn map_record_fresh(
        &self,
        tree: &AttributeTree,
        source: Option<&RecordSource>,
    ) -> Result<Vec<u8>, MappingError> {
        let mut store = GraphStore::new();
        self.map_record(&mut store, tree, source)?;
        Ok(store.export(GraphFormat::NTriples)?)
    }

    /// Create every entity that contains `class`, link it to `current`, and
    /// continue upward from it.
    fn create_parent_instances(
        &self,
        store: &mut GraphStore,
        tree: &AttributeTree,
        current: &EntityId,
        class: &ClassIri,
        visited: &mut HashSet<ClassIri>,
    ) -> Result<(), MappingError> {
        for AncestorRelation { owner, relation } in self.schema.ancestor_relations(class) {
            let Some(key) = self.schema.key_property(&owner) else {
                tracing::debug!("ancestor class {owner} has no key, skipping");
                continue;
            };
            let key_value = self.key_value(tree, &key)?;
            let parent = store.create_or_get_instance(&owner, key_value, Some(&key))?;
            store.add_object_fact(&parent, &relation, current)?;

            if visited.insert(owner.clone()) {
                self.create_parent_instances(store, tree, &parent, &owner, visited)?;
            } else {
                tracing::debug!("ancestor class {owner} already visited for this record");
            }
        }
        Ok(())
    }

    /// Attach a simple element to `current`, or to the entity its property
    /// belongs to when there is no current entity.
    ///
    /// Both candidate properties for the tag are tried. The entity opened for
    /// the first one is reused for the second.
    fn parse_element(
        &self,
        store: &mut GraphStore,
        root_tree: &AttributeTree,
        element: &Element,
        current: Option<&EntityId>,
    ) -> Result<(), MappingError> {
        let Some(value) = element.as_text() else {
            return Ok(());
        };
        let mut current = current.cloned();

        for property in self.schema.vocabulary().candidate_properties(element.tag) {
            if !self.schema.property_exists(&property) {
                tracing::trace!("{property} not in schema");
                continue;
            }

            let subject = if let Some(subject) = &current {
                subject.clone()
            } else {
                let Some(class) = self.schema.entity_type_for_property(&property) else {
                    tracing::debug!("{property} is not related to an entity, skipping");
                    continue;
                };
                let Some(key) = self.schema.key_property(&class) else {
                    tracing::debug!("class {class} has no key, skipping {property}");
                    continue;
                };
                let key_value = self.key_value(root_tree, &key)?;
                let subject = store.create_or_get_instance(&class, key_value, Some(&key))?;
                current = Some(subject.clone());
                subject
            };

            match self.schema.property_kind(&property) {
                Some(PropertyKind::Object) => {
                    let object = store.value_as_entity_reference(value);
                    store.add_object_fact(&subject, &property, &object)?;
                }
                Some(PropertyKind::Literal) => {
                    store.add_literal_fact(&subject, &property, value)?;
                }
                None => tracing::debug!("{property} has no property kind, skipping"),
            }
        }
        Ok(())
    }

    /// Create the container entity for a sequence under `owner` and one item
    /// entity per sequence item, then map each item's elements onto it.
    fn parse_sequence(
        &self,
        store: &mut GraphStore,
        root_tree: &AttributeTree,
        element: &Element,
        owner: &EntityId,
    ) -> Result<(), MappingError> {
        let ElementValue::Sequence(items) = &element.value else {
            return Ok(());
        };
        let has_sequence_item = self.schema.vocabulary().has_sequence_item();

        for property in self.schema.vocabulary().candidate_properties(element.tag) {
            if !self.schema.property_exists(&property) {
                continue;
            }
            let Some(container_class) = self.schema.sequence_container_type(&property) else {
                tracing::debug!("{property} has no container class, skipping");
                continue;
            };

            let container_id = owner.child(element.tag);
            let container =
                store.create_or_get_instance(&container_class, container_id.as_str(), None)?;
            store.add_object_fact(owner, &property, &container)?;

            if items.is_empty() {
                continue;
            }
            let Some(item_class) = self.schema.sequence_item_type(&container_class) else {
                tracing::debug!("container {container_class} has no item class, skipping items");
                continue;
            };

            for (index, item) in items.iter().enumerate() {
                let item_id = container.child(index);
                let item_entity =
                    store.create_or_get_instance(&item_class, item_id.as_str(), None)?;
                store.add_object_fact(&container, &has_sequence_item, &item_entity)?;

                for nested in item {
                    if nested.is_sequence() {
                        self.parse_sequence(store, root_tree, nested, &item_entity)?;
                    } else {
                        self.parse_element(store, root_tree, nested, Some(&item_entity))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Read the value of a key property's attribute from the record.
    fn key_value<'t>(
        &self,
        tree: &'t AttributeTree,
        key: &PropertyIri,
    ) -> Result<&'t str, MappingError> {
        let tag = self
            .schema
            .vocabulary()
            .tag_for_property(key)
            .ok_or_else(|| MappingError::UnencodedKey(key.clone()))?;
        tree.get(tag)
            .and_then(Element::as_text)
            .ok_or(MappingError::MissingAttribute { tag })
    }
}
