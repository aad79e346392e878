//! KET document loader.
//!
//! The inverse of the saver: parses a KET document with `serde_json` and
//! rebuilds the [`KetDocument`] it describes. A document that does not have the
//! KET shape (missing root, wrong field types, unknown node references) is a
//! [`LoadError`]. Broken cross-references inside an otherwise readable document
//! are [`Diagnostics`], and the element holding them is dropped.
//!
//! Reactions come back with one [`ReactionMolecule`](crate::core::models::reaction::ReactionMolecule)
//! per molecule component, its role taken from the area of its summary block.

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::error::LoadError;
use super::layout::ReactionArea;
use crate::core::models::atom::{Aromaticity, Atom, AtomKind, AttachmentOrder, QueryAtomProps};
use crate::core::models::document::KetDocument;
use crate::core::models::ids::TemplateId;
use crate::core::models::meta::{ArrowKind, MetaObject, ReactionArrow, ShapeMode};
use crate::core::models::molecule::{IndexSelection, Molecule};
use crate::core::models::reaction::{Reaction, ReactionRole};
use crate::core::models::sgroup::{
    Connectivity, DataSGroup, SGroup, SGroupKind, SuperatomAttachment,
};
use crate::core::models::stereo::{CipDescriptor, StereoCenter, StereoKind};
use crate::core::models::template::{Template, TemplateKind};
use crate::core::models::text::TextObject;
use crate::core::models::topology::{Bond, BondOrder, BondStereo};
use crate::core::tables::{KET_FORMAT, cip_from_token};
use nalgebra::{Point2, Point3};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Single-use loader: one instance per pass.
#[derive(Debug, Default)]
pub struct KetLoader {
    diagnostics: Diagnostics,
}

impl KetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` as a KET document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the text is not JSON or does not have the shape
    /// of a KET document.
    pub fn load(mut self, text: &str) -> Result<(KetDocument, Diagnostics), LoadError> {
        let top: Value = serde_json::from_str(text)?;
        let root = field(&top, "document", "root")?;
        if let Some(format) = opt_string(root, "root", "format")? {
            if format != KET_FORMAT {
                return Err(invalid("root", format!("unsupported format '{}'", format)));
            }
        }
        let nodes = array(root, "root", "nodes")?;
        debug!(nodes = nodes.len(), "Reading KET document.");

        let mut document = KetDocument::new();
        for (i, node) in nodes.iter().enumerate() {
            let here = format!("root/nodes/{}", i);
            let kind = string(node, &here, "type")?;
            let id = string(node, &here, "$ref")?;
            let entry = top
                .get(id)
                .ok_or_else(|| LoadError::UnknownRef(id.to_string()))?;
            match kind {
                "molecule" => document.push_molecule(self.read_molecule(id, entry)?),
                "reaction" => document.push_reaction(self.read_reaction(&top, id, entry)?),
                other => {
                    return Err(invalid(&here, format!("unknown node type '{}'", other)));
                }
            }
        }

        debug!(
            diagnostics = self.diagnostics.len(),
            "KET document read."
        );
        Ok((document, self.diagnostics))
    }

    fn read_molecule(&mut self, location: &str, value: &Value) -> Result<Molecule, LoadError> {
        trace!(location, "Reading molecule.");
        let mut mol = if opt_bool(value, location, "query")? {
            Molecule::new_query()
        } else {
            Molecule::new()
        };

        let mut template_names: HashMap<String, TemplateId> = HashMap::new();
        if let Some(templates) = opt_array(value, location, "templates")? {
            for (i, entry) in templates.iter().enumerate() {
                let here = format!("{}/templates/{}", location, i);
                let template = self.read_template(&here, entry)?;
                let name = template.name.clone();
                template_names.insert(name, mol.templates.add(template));
            }
        }

        let mut stereo_groups: Vec<Option<StereoKind>> = Vec::new();
        let mut stereo_labels: Vec<Option<String>> = Vec::new();
        if let Some(atoms) = opt_array(value, location, "atoms")? {
            for (i, entry) in atoms.iter().enumerate() {
                let here = format!("{}/atoms/{}", location, i);
                let (atom, group, label) = self.read_atom(&here, entry, &template_names)?;
                let index = mol.add_atom(atom);
                if let Some(component) = opt_uint::<u32>(
                    entry.get("queryProperties").unwrap_or(&Value::Null),
                    &here,
                    "component",
                )? {
                    if let Some(query) = mol.query.as_mut() {
                        query.components[index] = component;
                    }
                }
                stereo_groups.push(group);
                stereo_labels.push(label);
            }
        }

        if let Some(bonds) = opt_array(value, location, "bonds")? {
            for (i, entry) in bonds.iter().enumerate() {
                let here = format!("{}/bonds/{}", location, i);
                let bond = self.read_bond(&here, entry)?;
                if mol.push_bond(bond).is_none() {
                    self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        here,
                        format!(
                            "bond {}-{} does not join two atoms of the molecule",
                            bond.begin, bond.end
                        ),
                    );
                }
            }
        }

        if let Some(centers) = opt_array(value, location, "stereoCenters")? {
            for (i, entry) in centers.iter().enumerate() {
                let here = format!("{}/stereoCenters/{}", location, i);
                let atom = index(field(entry, &here, "atom")?, &here)?;
                let token = string(entry, &here, "type")?;
                if atom >= mol.atom_count() {
                    self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        here,
                        format!("stereocenter on missing atom {}", atom),
                    );
                    continue;
                }
                let Some(descriptor) = cip_from_token(token) else {
                    self.diagnostics.push(
                        DiagnosticKind::UnrecognizedDescriptor,
                        here,
                        format!("'{}' is not a CIP descriptor", token),
                    );
                    continue;
                };
                let kind = stereo_groups[atom].unwrap_or_default();
                mol.stereocenters
                    .push(StereoCenter::new(atom, kind, descriptor));
            }
        }
        // Enhanced stereo groups on atoms whose descriptor was never computed.
        for (atom, group) in stereo_groups.iter().enumerate() {
            if let Some(kind) = group {
                if mol.stereocenter(atom).is_none() {
                    mol.stereocenters
                        .push(StereoCenter::new(atom, *kind, CipDescriptor::None));
                }
            }
        }

        if let Some(groups) = opt_array(value, location, "sgroups")? {
            for (i, entry) in groups.iter().enumerate() {
                let here = format!("{}/sgroups/{}", location, i);
                let group = read_sgroup(&here, entry)?;
                let n = mol.atom_count();
                if let Some(missing) = group.referenced_atoms().find(|&a| a >= n) {
                    self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        here,
                        format!("{} group refers to missing atom {}", group.kind.code(), missing),
                    );
                    continue;
                }
                mol.sgroups.push(group);
            }
        }
        self.restore_descriptor_groups(location, &mut mol, &stereo_labels);

        mol.highlight = self.read_index_selection(location, value, "highlight", &mol)?;
        mol.selection = self.read_index_selection(location, value, "selection", &mol)?;

        if let Some(metas) = opt_array(value, location, "metaObjects")? {
            for (i, entry) in metas.iter().enumerate() {
                let here = format!("{}/metaObjects/{}", location, i);
                if let Some(meta) = self.read_meta_object(&here, entry)? {
                    mol.meta_objects.push(meta);
                }
            }
        }

        Ok(mol)
    }

    fn read_template(&mut self, location: &str, value: &Value) -> Result<Template, LoadError> {
        let name = string(value, location, "id")?.to_string();
        let kind = match string(value, location, "kind")? {
            "rgroup" => TemplateKind::RGroup {
                number: uint(value, location, "number")?,
            },
            "tgroup" => TemplateKind::TGroup {
                class: string(value, location, "class")?.to_string(),
                alias: opt_string(value, location, "alias")?.map(str::to_string),
            },
            other => {
                return Err(invalid(location, format!("unknown template kind '{}'", other)));
            }
        };
        let molecule = self.read_molecule(
            &format!("{}/molecule", location),
            field(value, location, "molecule")?,
        )?;
        Ok(Template {
            name,
            kind,
            molecule,
        })
    }

    fn read_atom(
        &mut self,
        location: &str,
        value: &Value,
        templates: &HashMap<String, TemplateId>,
    ) -> Result<(Atom, Option<StereoKind>, Option<String>), LoadError> {
        let position = point3(field(value, location, "location")?, location)?;
        let mut atom = match opt_string(value, location, "type")? {
            Some("rg-label") => {
                let mut rgroups = Vec::new();
                for name in array(value, location, "$refs")? {
                    let name = name
                        .as_str()
                        .ok_or_else(|| invalid(location, "'$refs' must list template names"))?;
                    match templates.get(name) {
                        Some(&id) => rgroups.push(id),
                        None => self.diagnostics.push(
                            DiagnosticKind::DanglingReference,
                            location,
                            format!("R-site refers to unknown template '{}'", name),
                        ),
                    }
                }
                let mut atom = Atom::rsite(rgroups, position);
                if let Some(order) = opt_array(value, location, "attachmentOrder")? {
                    let entries = order
                        .iter()
                        .map(|entry| -> Result<AttachmentOrder, LoadError> {
                            Ok(AttachmentOrder {
                                atom: index(field(entry, location, "attachmentAtom")?, location)?,
                                id: uint(entry, location, "attachmentId")?,
                            })
                        })
                        .collect::<Result<Vec<_>, LoadError>>()?;
                    if let AtomKind::RSite {
                        attachment_order, ..
                    } = &mut atom.kind
                    {
                        *attachment_order = entries;
                    }
                }
                atom
            }
            Some("template") => {
                let name = string(value, location, "templateRef")?;
                let label = opt_string(value, location, "label")?.unwrap_or(name);
                match templates.get(name) {
                    Some(&id) => Atom::template(id, label, position),
                    None => {
                        self.diagnostics.push(
                            DiagnosticKind::DanglingReference,
                            location,
                            format!("atom refers to unknown template '{}'", name),
                        );
                        Atom::new(label, position)
                    }
                }
            }
            Some(other) => {
                return Err(invalid(location, format!("unknown atom type '{}'", other)));
            }
            None => Atom::new(string(value, location, "label")?, position),
        };

        if let Some(charge) = value.get("charge") {
            atom.charge = charge
                .as_i64()
                .and_then(|c| i32::try_from(c).ok())
                .ok_or_else(|| invalid(location, "'charge' must be a 32-bit integer"))?;
        }
        atom.isotope = opt_uint(value, location, "isotope")?.unwrap_or(0);
        atom.radical = opt_uint(value, location, "radical")?.unwrap_or(0);
        atom.stereo_parity = opt_uint(value, location, "stereoParity")?.unwrap_or(0);
        atom.attachment_points = opt_uint(value, location, "attachmentPoints")?.unwrap_or(0);

        let group = match opt_string(value, location, "stereoGroup")? {
            Some(text) => match text.parse::<StereoKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    self.diagnostics
                        .push(DiagnosticKind::UnrecognizedDescriptor, location, e.to_string());
                    None
                }
            },
            None => None,
        };
        let label = opt_string(value, location, "stereoLabel")?.map(str::to_string);

        if let Some(props) = value.get("queryProperties") {
            atom.query = self.read_query_properties(location, props)?;
        }
        Ok((atom, group, label))
    }

    fn read_query_properties(
        &mut self,
        location: &str,
        value: &Value,
    ) -> Result<Option<QueryAtomProps>, LoadError> {
        let mut props = QueryAtomProps {
            ring_membership: opt_uint(value, location, "ringMembership")?,
            ring_size: opt_uint(value, location, "ringSize")?,
            connectivity: opt_uint(value, location, "connectivity")?,
            custom_query: opt_string(value, location, "customQuery")?.map(str::to_string),
            ..Default::default()
        };
        if let Some(text) = opt_string(value, location, "aromaticity")? {
            match text.parse::<Aromaticity>() {
                Ok(aromaticity) => props.aromaticity = Some(aromaticity),
                Err(()) => self.diagnostics.push(
                    DiagnosticKind::MalformedQueryAttribute,
                    location,
                    format!("unknown aromaticity '{}'", text),
                ),
            }
        }
        Ok((!props.is_empty()).then_some(props))
    }

    fn read_bond(&mut self, location: &str, value: &Value) -> Result<Bond, LoadError> {
        let code: u8 = uint(value, location, "type")?;
        let order = BondOrder::from_code(code)
            .ok_or_else(|| invalid(location, format!("unknown bond type {}", code)))?;
        let ends = indices(field(value, location, "atoms")?, location)?;
        let [begin, end] = ends.as_slice() else {
            return Err(invalid(location, "a bond joins exactly two atoms"));
        };
        let mut bond = Bond::new(*begin, *end, order);
        if let Some(code) = opt_uint::<u8>(value, location, "stereo")? {
            bond.stereo = BondStereo::from_code(code)
                .ok_or_else(|| invalid(location, format!("unknown bond stereo {}", code)))?;
        }
        if let Some(token) = opt_string(value, location, "cip")? {
            match cip_from_token(token) {
                Some(cip) => bond.cip = cip,
                None => self.diagnostics.push(
                    DiagnosticKind::UnrecognizedDescriptor,
                    location,
                    format!("'{}' is not a CIP descriptor", token),
                ),
            }
        }
        Ok(bond)
    }

    /// Atom stereo labels that no stereocenter accounts for come back as CIP
    /// data groups, appended after the regular groups.
    fn restore_descriptor_groups(
        &mut self,
        location: &str,
        mol: &mut Molecule,
        labels: &[Option<String>],
    ) {
        for (atom, label) in labels.iter().enumerate() {
            let Some(label) = label else {
                continue;
            };
            let Some(descriptor) = cip_from_token(label) else {
                self.diagnostics.push(
                    DiagnosticKind::UnrecognizedDescriptor,
                    format!("{}/atoms/{}", location, atom),
                    format!("'{}' is not a CIP descriptor", label),
                );
                continue;
            };
            if mol
                .stereocenter(atom)
                .is_some_and(|center| center.descriptor == descriptor)
            {
                continue;
            }
            mol.sgroups.push(SGroup::cip_descriptor(atom, label));
        }
    }

    fn read_index_selection(
        &mut self,
        location: &str,
        value: &Value,
        name: &'static str,
        mol: &Molecule,
    ) -> Result<IndexSelection, LoadError> {
        let mut selection = IndexSelection::default();
        let Some(entries) = opt_array(value, location, name)? else {
            return Ok(selection);
        };
        let here = format!("{}/{}", location, name);
        for entry in entries {
            let items = indices(field(entry, &here, "items")?, &here)?;
            let (target, count, entity) = match string(entry, &here, "entityType")? {
                "atoms" => (&mut selection.atoms, mol.atom_count(), "atom"),
                "bonds" => (&mut selection.bonds, mol.bond_count(), "bond"),
                other => {
                    return Err(invalid(&here, format!("unknown entity type '{}'", other)));
                }
            };
            for item in items {
                if item < count {
                    target.insert(item);
                } else {
                    self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        &here,
                        format!("{} {} does not exist", entity, item),
                    );
                }
            }
        }
        Ok(selection)
    }

    /// Reads one meta-object. Unknown types are reported and skipped.
    fn read_meta_object(
        &mut self,
        location: &str,
        value: &Value,
    ) -> Result<Option<MetaObject>, LoadError> {
        let kind = string(value, location, "type")?;
        let meta = match kind {
            "text" => {
                let position = point3(field(value, location, "position")?, location)?;
                let text = TextObject::new(position, string(value, location, "content")?);
                for issue in text.issues() {
                    self.diagnostics
                        .push(DiagnosticKind::MalformedAnnotation, location, issue.clone());
                }
                MetaObject::Text(text)
            }
            "arrow" => MetaObject::Arrow(read_arrow(location, value)?),
            "plus" => MetaObject::plus(point2(field(value, location, "location")?, location)?),
            _ => match kind.parse::<ShapeMode>() {
                Ok(mode) => {
                    let [a, b] = read_segment(location, value, "pos")?;
                    MetaObject::shape(mode, a, b)
                }
                Err(e) => {
                    self.diagnostics
                        .push(DiagnosticKind::MalformedAnnotation, location, e.to_string());
                    return Ok(None);
                }
            },
        };
        Ok(Some(meta))
    }

    fn read_reaction(
        &mut self,
        top: &Value,
        location: &str,
        value: &Value,
    ) -> Result<Reaction, LoadError> {
        let mut areas = Vec::new();
        if let Some(summaries) = opt_array(value, location, "summaries")? {
            for (i, summary) in summaries.iter().enumerate() {
                let here = format!("{}/summaries/{}", location, i);
                let area = string(summary, &here, "area")?
                    .parse::<ReactionArea>()
                    .map_err(|message| invalid(&here, message))?;
                areas.push(area);
            }
        }

        let mut reaction = Reaction::new();
        for (i, component) in array(value, location, "components")?.iter().enumerate() {
            let here = format!("{}/components/{}", location, i);
            match string(component, &here, "type")? {
                "molecule" => {
                    let id = string(component, &here, "$ref")?;
                    let entry = top
                        .get(id)
                        .ok_or_else(|| LoadError::UnknownRef(id.to_string()))?;
                    let role = match opt_uint::<usize>(component, &here, "summary")? {
                        Some(summary) => match areas.get(summary) {
                            Some(area) => area.role(),
                            None => {
                                self.diagnostics.push(
                                    DiagnosticKind::DanglingReference,
                                    &here,
                                    format!("summary block {} does not exist", summary),
                                );
                                ReactionRole::Undefined
                            }
                        },
                        None => ReactionRole::Undefined,
                    };
                    let molecule = self.read_molecule(id, entry)?;
                    reaction.add_molecule(role, molecule);
                }
                "plus" => {
                    let position = point2(field(component, &here, "location")?, &here)?;
                    reaction.meta_objects.push(MetaObject::plus(position));
                }
                "arrow" => {
                    let arrow = read_arrow(&here, component)?;
                    reaction.meta_objects.push(MetaObject::Arrow(arrow));
                }
                other => {
                    return Err(invalid(&here, format!("unknown component type '{}'", other)));
                }
            }
        }

        if let Some(metas) = opt_array(value, location, "metaObjects")? {
            for (i, entry) in metas.iter().enumerate() {
                let here = format!("{}/metaObjects/{}", location, i);
                if let Some(meta) = self.read_meta_object(&here, entry)? {
                    reaction.meta_objects.push(meta);
                }
            }
        }
        Ok(reaction)
    }
}

fn read_sgroup(location: &str, value: &Value) -> Result<SGroup, LoadError> {
    let atoms = indices(field(value, location, "atoms")?, location)?;
    let kind = match string(value, location, "type")? {
        "DAT" => SGroupKind::Data(DataSGroup {
            name: string(value, location, "fieldName")?.to_string(),
            data: opt_string(value, location, "fieldData")?
                .unwrap_or_default()
                .to_string(),
            absolute: opt_bool(value, location, "absolute")?,
            attached: opt_bool(value, location, "attached")?,
            position: value
                .get("location")
                .map(|p| point2(p, location))
                .transpose()?,
        }),
        "SUP" => {
            let mut attachment_points = Vec::new();
            for point in opt_array(value, location, "attachmentPoints")?.unwrap_or_default() {
                attachment_points.push(SuperatomAttachment {
                    atom: index(field(point, location, "attachmentAtom")?, location)?,
                    leaving_atom: point
                        .get("leavingAtom")
                        .map(|a| index(a, location))
                        .transpose()?,
                    id: string(point, location, "attachmentId")?.to_string(),
                });
            }
            SGroupKind::Superatom {
                label: string(value, location, "name")?.to_string(),
                expanded: opt_bool(value, location, "expanded")?,
                attachment_points,
            }
        }
        "SRU" => {
            let connectivity = match opt_string(value, location, "connectivity")? {
                Some(text) => text.parse::<Connectivity>().map_err(|()| {
                    invalid(location, format!("unknown connectivity '{}'", text))
                })?,
                None => Default::default(),
            };
            SGroupKind::RepeatingUnit {
                subscript: opt_string(value, location, "subscript")?
                    .unwrap_or("n")
                    .to_string(),
                connectivity,
            }
        }
        "MUL" => SGroupKind::Multiple {
            multiplier: uint(value, location, "mul")?,
            parent_atoms: match value.get("parentAtoms") {
                Some(parents) => indices(parents, location)?,
                None => Vec::new(),
            },
        },
        "GEN" => SGroupKind::Generic,
        other => {
            return Err(invalid(location, format!("unknown S-group type '{}'", other)));
        }
    };
    Ok(SGroup::new(kind, atoms))
}

fn read_arrow(location: &str, value: &Value) -> Result<ReactionArrow, LoadError> {
    let mode = string(value, location, "mode")?;
    let kind = mode
        .parse::<ArrowKind>()
        .map_err(|e| invalid(location, e.to_string()))?;
    let [begin, end] = read_segment(location, value, "pos")?;
    let mut arrow = ReactionArrow::new(kind, begin, end);
    if let Some(height) = value.get("height") {
        arrow.height = number(height, location)?;
    }
    Ok(arrow)
}

fn read_segment(
    location: &str,
    value: &Value,
    name: &'static str,
) -> Result<[Point2<f64>; 2], LoadError> {
    match array(value, location, name)? {
        [a, b] => Ok([point2(a, location)?, point2(b, location)?]),
        _ => Err(invalid(location, format!("'{}' must hold two points", name))),
    }
}

// ---- typed field access ----

fn invalid(location: &str, message: impl Into<String>) -> LoadError {
    LoadError::InvalidValue {
        location: location.to_string(),
        message: message.into(),
    }
}

fn field<'v>(value: &'v Value, location: &str, name: &'static str) -> Result<&'v Value, LoadError> {
    value.get(name).ok_or_else(|| LoadError::MissingField {
        location: location.to_string(),
        field: name,
    })
}

fn array<'v>(value: &'v Value, location: &str, name: &'static str) -> Result<&'v [Value], LoadError> {
    field(value, location, name)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(location, format!("'{}' must be an array", name)))
}

fn opt_array<'v>(
    value: &'v Value,
    location: &str,
    name: &'static str,
) -> Result<Option<&'v [Value]>, LoadError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => array(value, location, name).map(Some),
    }
}

fn string<'v>(value: &'v Value, location: &str, name: &'static str) -> Result<&'v str, LoadError> {
    field(value, location, name)?
        .as_str()
        .ok_or_else(|| invalid(location, format!("'{}' must be a string", name)))
}

fn opt_string<'v>(
    value: &'v Value,
    location: &str,
    name: &'static str,
) -> Result<Option<&'v str>, LoadError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string(value, location, name).map(Some),
    }
}

fn opt_bool(value: &Value, location: &str, name: &'static str) -> Result<bool, LoadError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(false),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| invalid(location, format!("'{}' must be a boolean", name))),
    }
}

fn uint<T: TryFrom<u64>>(value: &Value, location: &str, name: &'static str) -> Result<T, LoadError> {
    field(value, location, name)?
        .as_u64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| invalid(location, format!("'{}' is not an unsigned integer in range", name)))
}

fn opt_uint<T: TryFrom<u64>>(
    value: &Value,
    location: &str,
    name: &'static str,
) -> Result<Option<T>, LoadError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => uint(value, location, name).map(Some),
    }
}

fn index(value: &Value, location: &str) -> Result<usize, LoadError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(location, format!("{} is not an index", value)))
}

fn indices(value: &Value, location: &str) -> Result<Vec<usize>, LoadError> {
    value
        .as_array()
        .ok_or_else(|| invalid(location, "expected an array of indices"))?
        .iter()
        .map(|v| index(v, location))
        .collect()
}

fn number(value: &Value, location: &str) -> Result<f64, LoadError> {
    value
        .as_f64()
        .ok_or_else(|| invalid(location, format!("{} is not a number", value)))
}

fn coordinates(value: &Value, location: &str) -> Result<Vec<f64>, LoadError> {
    value
        .as_array()
        .ok_or_else(|| invalid(location, "expected a coordinate array"))?
        .iter()
        .map(|v| number(v, location))
        .collect()
}

fn point2(value: &Value, location: &str) -> Result<Point2<f64>, LoadError> {
    match coordinates(value, location)?.as_slice() {
        [x, y] | [x, y, _] => Ok(Point2::new(*x, *y)),
        _ => Err(invalid(location, "expected [x, y]")),
    }
}

/// Accepts `[x, y]` as well, with `z = 0`.
fn point3(value: &Value, location: &str) -> Result<Point3<f64>, LoadError> {
    match coordinates(value, location)?.as_slice() {
        [x, y] => Ok(Point3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(invalid(location, "expected [x, y, z]")),
    }
}
