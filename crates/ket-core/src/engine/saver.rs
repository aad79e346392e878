//! KET document saver.
//!
//! A [`KetSaver`] walks a [`KetDocument`] once and pushes every element through
//! a [`JsonWriter`]. Each molecule is written in fixed stages: atoms, bonds,
//! stereocenters, S-groups, templates, highlight, selection and meta-objects.
//! Stages without data are omitted. Reactions additionally go through
//! [`ReactionLayout`] and are written as a component list with summary blocks,
//! each molecule fragment becoming its own top-level entry.
//!
//! Problems local to one element are recorded as [`Diagnostics`] and that
//! element is skipped; only a missing input or a writer failure aborts the pass.

use super::config::SaverConfig;
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::error::SaveError;
use super::layout::{ComponentKind, ReactionLayout, SummaryLink};
use crate::core::io::writer::JsonWriter;
use crate::core::models::atom::{Atom, AtomKind, AttachmentOrder, QueryAtomProps};
use crate::core::models::document::{KetDocument, KetNode};
use crate::core::models::meta::{MetaObject, ReactionArrow};
use crate::core::models::molecule::{IndexSelection, Molecule};
use crate::core::models::reaction::Reaction;
use crate::core::models::sgroup::{SGroup, SGroupKind};
use crate::core::models::stereo::StereoKind;
use crate::core::models::template::TemplateKind;
use crate::core::tables::{KET_FORMAT, cip_from_token, cip_token};
use crate::core::utils::classify::is_stereo_descriptor_group;
use crate::core::utils::geometry::Rect2;
use nalgebra::{Point2, Point3};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{debug, trace};

type SaveResult = Result<(), SaveError>;

enum NodePlan<'d> {
    Molecule {
        id: String,
        molecule: &'d Molecule,
    },
    Reaction {
        id: String,
        reaction: &'d Reaction,
        layout: ReactionLayout,
        /// Entry id of each molecule component, by component index.
        fragment_ids: Vec<Option<String>>,
    },
}

impl NodePlan<'_> {
    fn head(&self) -> (&'static str, &str) {
        match self {
            Self::Molecule { id, .. } => ("molecule", id),
            Self::Reaction { id, .. } => ("reaction", id),
        }
    }
}

/// Assigns entry ids (`mol0`, `mol1`, ..., `rxn0`, ...) and builds the layout of
/// every reaction before anything is written.
fn plan(document: &KetDocument) -> Vec<NodePlan<'_>> {
    let mut next_molecule = 0;
    let mut next_reaction = 0;
    let mut plans = Vec::with_capacity(document.nodes.len());

    for node in &document.nodes {
        match node {
            KetNode::Molecule(molecule) => {
                plans.push(NodePlan::Molecule {
                    id: format!("mol{}", next_molecule),
                    molecule,
                });
                next_molecule += 1;
            }
            KetNode::Reaction(reaction) => {
                let layout = ReactionLayout::build(reaction);
                let fragment_ids = layout
                    .components
                    .iter()
                    .map(|c| {
                        c.molecule.as_ref().map(|_| {
                            let id = format!("mol{}", next_molecule);
                            next_molecule += 1;
                            id
                        })
                    })
                    .collect();
                plans.push(NodePlan::Reaction {
                    id: format!("rxn{}", next_reaction),
                    reaction,
                    layout,
                    fragment_ids,
                });
                next_reaction += 1;
            }
        }
    }
    plans
}

/// Single-use saver: one instance per pass.
pub struct KetSaver<'c> {
    config: &'c SaverConfig,
    diagnostics: Diagnostics,
}

impl<'c> KetSaver<'c> {
    pub fn new(config: &'c SaverConfig) -> Self {
        Self {
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Writes `document` as one complete KET document.
    ///
    /// # Return
    ///
    /// The diagnostics of the pass.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::MissingInput`] if the writer has no sink or the
    /// document holds no structure, and [`SaveError::Writer`] if emission fails.
    /// On error the sink holds truncated output.
    pub fn save<W: Write>(
        mut self,
        document: &KetDocument,
        writer: &mut JsonWriter<W>,
    ) -> Result<Diagnostics, SaveError> {
        if !writer.is_bound() {
            return Err(SaveError::MissingInput("writer"));
        }
        if document.is_empty() {
            return Err(SaveError::MissingInput("document"));
        }

        let plans = plan(document);
        debug!(nodes = plans.len(), "Writing KET document.");

        writer.start_object()?;
        writer.key("root")?;
        writer.start_object()?;
        writer.key("format")?;
        writer.string(KET_FORMAT)?;
        writer.key("nodes")?;
        writer.start_array()?;
        for plan in &plans {
            let (kind, id) = plan.head();
            writer.start_object()?;
            writer.key("type")?;
            writer.string(kind)?;
            writer.key("$ref")?;
            writer.string(id)?;
            writer.end_object()?;
        }
        writer.end_array()?;
        writer.end_object()?;

        for plan in &plans {
            match plan {
                NodePlan::Molecule { id, molecule } => {
                    writer.key(id)?;
                    self.write_molecule(writer, id, molecule)?;
                }
                NodePlan::Reaction {
                    id,
                    reaction,
                    layout,
                    fragment_ids,
                } => {
                    writer.key(id)?;
                    self.write_reaction(writer, id, reaction, layout, fragment_ids)?;
                    for (component, fragment_id) in layout.components.iter().zip(fragment_ids) {
                        if let (Some(molecule), Some(fragment_id)) =
                            (&component.molecule, fragment_id)
                        {
                            writer.key(fragment_id)?;
                            self.write_molecule(writer, fragment_id, molecule)?;
                        }
                    }
                }
            }
        }

        writer.end_object()?;
        writer.flush()?;
        debug!(
            diagnostics = self.diagnostics.len(),
            "KET document written."
        );
        Ok(self.diagnostics)
    }

    fn write_molecule<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
    ) -> SaveResult {
        trace!(location, atoms = mol.atom_count(), "Writing molecule.");
        w.start_object()?;
        w.key("type")?;
        w.string("molecule")?;
        if mol.is_query() {
            w.key("query")?;
            w.bool(true)?;
        }
        self.write_atoms(w, location, mol)?;
        write_bonds(w, mol)?;
        self.write_stereocenters(w, location, mol)?;
        self.write_sgroups(w, location, mol)?;
        self.write_templates(w, location, mol)?;
        self.write_index_selection(w, location, "highlight", &mol.highlight, mol)?;
        self.write_index_selection(w, location, "selection", &mol.selection, mol)?;
        self.write_meta_objects(w, location, mol.meta_objects.iter())?;
        w.end_object()?;
        Ok(())
    }

    // ---- atoms ----

    /// Descriptor token shown on each atom: the stereocenter's own descriptor,
    /// or else the one carried by a CIP data group.
    fn stereo_labels(&mut self, location: &str, mol: &Molecule) -> Vec<Option<&'static str>> {
        let mut labels = vec![None; mol.atom_count()];
        for (i, group) in mol.sgroups.iter().enumerate() {
            if !is_stereo_descriptor_group(group) {
                continue;
            }
            let SGroupKind::Data(data) = &group.kind else {
                continue;
            };
            let here = format!("{}/sgroups/{}", location, i);
            let Some(&atom) = group.atoms.first() else {
                self.diagnostics.push(
                    DiagnosticKind::MalformedAnnotation,
                    here,
                    "descriptor group has no atom",
                );
                continue;
            };
            if atom >= labels.len() {
                self.diagnostics.push(
                    DiagnosticKind::DanglingReference,
                    here,
                    format!("descriptor group refers to missing atom {}", atom),
                );
                continue;
            }
            let token = data.data.trim().trim_start_matches('(').trim_end_matches(')');
            match cip_from_token(token).and_then(cip_token) {
                Some(token) => labels[atom] = Some(token),
                None => self.diagnostics.push(
                    DiagnosticKind::UnrecognizedDescriptor,
                    here,
                    format!("'{}' is not a CIP descriptor", data.data),
                ),
            }
        }
        for center in &mol.stereocenters {
            if let Some(token) = cip_token(center.descriptor) {
                if let Some(slot) = labels.get_mut(center.atom) {
                    *slot = Some(token);
                }
            }
        }
        labels
    }

    fn write_atoms<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
    ) -> SaveResult {
        if mol.atom_count() == 0 {
            return Ok(());
        }
        let labels = if self.config.add_stereo_desc {
            self.stereo_labels(location, mol)
        } else {
            vec![None; mol.atom_count()]
        };

        w.key("atoms")?;
        w.start_array()?;
        for (index, atom) in mol.atoms().iter().enumerate() {
            let here = format!("{}/atoms/{}", location, index);
            self.write_atom(w, &here, mol, index, atom, labels[index])?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_atom<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
        index: usize,
        atom: &Atom,
        stereo_label: Option<&str>,
    ) -> SaveResult {
        w.start_object()?;
        match &atom.kind {
            AtomKind::Element => {
                w.key("label")?;
                w.string(&atom.label)?;
            }
            AtomKind::RSite { rgroups, .. } => {
                w.key("type")?;
                w.string("rg-label")?;
                w.key("$refs")?;
                w.start_array()?;
                for &id in rgroups {
                    match mol.templates.get(id) {
                        Some(template) => w.string(&template.name)?,
                        None => self.diagnostics.push(
                            DiagnosticKind::DanglingReference,
                            location,
                            format!("R-site refers to missing template {}", id.index()),
                        ),
                    }
                }
                w.end_array()?;
            }
            AtomKind::Template { template } => {
                match mol.templates.get(*template) {
                    Some(t) => {
                        w.key("type")?;
                        w.string("template")?;
                        w.key("templateRef")?;
                        w.string(&t.name)?;
                    }
                    None => self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        location,
                        format!("atom refers to missing template {}", template.index()),
                    ),
                }
                w.key("label")?;
                w.string(&atom.label)?;
            }
        }

        w.key("location")?;
        write_point3(w, &atom.position)?;
        if atom.charge != 0 {
            w.key("charge")?;
            w.int(atom.charge)?;
        }
        if atom.isotope != 0 {
            w.key("isotope")?;
            w.uint(atom.isotope)?;
        }
        if atom.radical != 0 {
            w.key("radical")?;
            w.uint(atom.radical as u32)?;
        }
        if atom.stereo_parity != 0 {
            w.key("stereoParity")?;
            w.uint(atom.stereo_parity as u32)?;
        }
        if let Some(center) = mol.stereocenter(index) {
            if center.kind != StereoKind::Abs {
                w.key("stereoGroup")?;
                w.string(&center.kind.to_string())?;
            }
        }
        if let Some(label) = stereo_label {
            w.key("stereoLabel")?;
            w.string(label)?;
        }
        if atom.attachment_points != 0 {
            w.key("attachmentPoints")?;
            w.uint(atom.attachment_points as u32)?;
        }
        if let AtomKind::RSite {
            attachment_order, ..
        } = &atom.kind
        {
            if !attachment_order.is_empty() {
                self.write_attachment_order(w, location, mol, index, attachment_order)?;
            }
        }
        self.write_query_properties(w, location, mol, index, atom)?;
        w.end_object()?;
        Ok(())
    }

    fn write_attachment_order<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
        rsite: usize,
        order: &[AttachmentOrder],
    ) -> SaveResult {
        let n = mol.atom_count();
        let valid: Vec<&AttachmentOrder> = order
            .iter()
            .filter(|entry| {
                let exists = entry.atom < n;
                if !exists {
                    self.diagnostics.push(
                        DiagnosticKind::DanglingReference,
                        location,
                        format!("attachment point {} refers to missing atom {}", entry.id, entry.atom),
                    );
                }
                exists
            })
            .collect();

        if let Err(reason) = check_attachment_order(mol, rsite, order) {
            self.diagnostics
                .push(DiagnosticKind::InconsistentAttachmentOrder, location, reason);
        }

        w.key("attachmentOrder")?;
        w.start_array()?;
        for entry in valid {
            w.start_object()?;
            w.key("attachmentAtom")?;
            write_index(w, entry.atom)?;
            w.key("attachmentId")?;
            w.uint(entry.id as u32)?;
            w.end_object()?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_query_properties<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
        index: usize,
        atom: &Atom,
    ) -> SaveResult {
        let component = mol
            .query
            .as_ref()
            .and_then(|q| q.components.get(index).copied())
            .filter(|&c| c > 0);
        let props = match atom.query.as_ref().filter(|p| !p.is_empty()) {
            Some(props) => match validate_query_props(props) {
                Ok(()) => Some(props),
                Err(reason) => {
                    self.diagnostics
                        .push(DiagnosticKind::MalformedQueryAttribute, location, reason);
                    None
                }
            },
            None => None,
        };
        if props.is_none() && component.is_none() {
            return Ok(());
        }

        w.key("queryProperties")?;
        w.start_object()?;
        if let Some(props) = props {
            if let Some(aromaticity) = props.aromaticity {
                w.key("aromaticity")?;
                w.string(aromaticity.as_str())?;
            }
            if let Some(count) = props.ring_membership {
                w.key("ringMembership")?;
                w.uint(count as u32)?;
            }
            if let Some(size) = props.ring_size {
                w.key("ringSize")?;
                w.uint(size as u32)?;
            }
            if let Some(connectivity) = props.connectivity {
                w.key("connectivity")?;
                w.uint(connectivity as u32)?;
            }
            if let Some(custom) = &props.custom_query {
                w.key("customQuery")?;
                w.string(custom)?;
            }
        }
        if let Some(component) = component {
            w.key("component")?;
            w.uint(component)?;
        }
        w.end_object()?;
        Ok(())
    }

    // ---- stereocenters, groups, templates ----

    fn write_stereocenters<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
    ) -> SaveResult {
        let mut entries = Vec::new();
        for (i, center) in mol.stereocenters.iter().enumerate() {
            let here = format!("{}/stereoCenters/{}", location, i);
            if center.atom >= mol.atom_count() {
                self.diagnostics.push(
                    DiagnosticKind::DanglingReference,
                    here,
                    format!("stereocenter on missing atom {}", center.atom),
                );
                continue;
            }
            match cip_token(center.descriptor) {
                Some(token) => entries.push((center.atom, token)),
                None => self.diagnostics.push(
                    DiagnosticKind::UnrecognizedDescriptor,
                    here,
                    format!(
                        "descriptor code {} on atom {} has no token",
                        center.descriptor.code(),
                        center.atom
                    ),
                ),
            }
        }
        if entries.is_empty() {
            return Ok(());
        }

        w.key("stereoCenters")?;
        w.start_array()?;
        for (atom, token) in entries {
            w.start_object()?;
            w.key("atom")?;
            write_index(w, atom)?;
            w.key("type")?;
            w.string(token)?;
            w.end_object()?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_sgroups<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
    ) -> SaveResult {
        let n = mol.atom_count();
        let mut groups: Vec<&SGroup> = Vec::new();
        for (i, group) in mol.sgroups.iter().enumerate() {
            if is_stereo_descriptor_group(group) {
                continue;
            }
            if let Some(missing) = group.referenced_atoms().find(|&a| a >= n) {
                self.diagnostics.push(
                    DiagnosticKind::DanglingReference,
                    format!("{}/sgroups/{}", location, i),
                    format!(
                        "{} group refers to atom {} of a molecule with {} atoms",
                        group.kind.code(),
                        missing,
                        n
                    ),
                );
                continue;
            }
            groups.push(group);
        }
        if groups.is_empty() {
            return Ok(());
        }

        w.key("sgroups")?;
        w.start_array()?;
        for group in groups {
            write_sgroup(w, group)?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_templates<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        mol: &Molecule,
    ) -> SaveResult {
        if mol.templates.is_empty() {
            return Ok(());
        }
        w.key("templates")?;
        w.start_array()?;
        for (id, template) in mol.templates.iter() {
            w.start_object()?;
            w.key("id")?;
            w.string(&template.name)?;
            match &template.kind {
                TemplateKind::RGroup { number } => {
                    w.key("kind")?;
                    w.string("rgroup")?;
                    w.key("number")?;
                    w.uint(*number)?;
                }
                TemplateKind::TGroup { class, alias } => {
                    w.key("kind")?;
                    w.string("tgroup")?;
                    w.key("class")?;
                    w.string(class)?;
                    if let Some(alias) = alias {
                        w.key("alias")?;
                        w.string(alias)?;
                    }
                }
            }
            w.key("molecule")?;
            let here = format!("{}/templates/{}", location, id.index());
            self.write_molecule(w, &here, &template.molecule)?;
            w.end_object()?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_index_selection<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        name: &'static str,
        selection: &IndexSelection,
        mol: &Molecule,
    ) -> SaveResult {
        let atoms = self.existing(location, name, "atom", &selection.atoms, mol.atom_count());
        let bonds = self.existing(location, name, "bond", &selection.bonds, mol.bond_count());
        if atoms.is_empty() && bonds.is_empty() {
            return Ok(());
        }

        w.key(name)?;
        w.start_array()?;
        for (entity, items) in [("atoms", atoms), ("bonds", bonds)] {
            if items.is_empty() {
                continue;
            }
            w.start_object()?;
            w.key("entityType")?;
            w.string(entity)?;
            w.key("items")?;
            w.start_array()?;
            for item in items {
                write_index(w, item)?;
            }
            w.end_array()?;
            w.end_object()?;
        }
        w.end_array()?;
        Ok(())
    }

    fn existing(
        &mut self,
        location: &str,
        name: &str,
        entity: &str,
        indices: &BTreeSet<usize>,
        count: usize,
    ) -> Vec<usize> {
        let (kept, missing): (Vec<usize>, Vec<usize>) =
            indices.iter().copied().partition(|&i| i < count);
        for index in missing {
            self.diagnostics.push(
                DiagnosticKind::DanglingReference,
                format!("{}/{}", location, name),
                format!("{} {} does not exist", entity, index),
            );
        }
        kept
    }

    // ---- meta-objects and reactions ----

    fn write_meta_objects<'m, W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        metas: impl Iterator<Item = &'m MetaObject>,
    ) -> SaveResult {
        let metas: Vec<&MetaObject> = metas.collect();
        if metas.is_empty() {
            return Ok(());
        }
        w.key("metaObjects")?;
        w.start_array()?;
        for (i, meta) in metas.into_iter().enumerate() {
            self.write_meta_object(w, &format!("{}/metaObjects/{}", location, i), meta)?;
        }
        w.end_array()?;
        Ok(())
    }

    fn write_meta_object<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        meta: &MetaObject,
    ) -> SaveResult {
        w.start_object()?;
        w.key("type")?;
        w.string(meta.type_name())?;
        match meta {
            MetaObject::Shape(shape) => {
                w.key("pos")?;
                w.start_array()?;
                write_point2(w, &shape.corners.0)?;
                write_point2(w, &shape.corners.1)?;
                w.end_array()?;
            }
            MetaObject::Text(text) => {
                for issue in text.issues() {
                    self.diagnostics
                        .push(DiagnosticKind::MalformedAnnotation, location, issue.clone());
                }
                w.key("position")?;
                write_point3(w, &text.position)?;
                w.key("content")?;
                w.string(text.content())?;
            }
            MetaObject::Arrow(arrow) => write_arrow_fields(w, arrow)?,
            MetaObject::Plus(plus) => {
                w.key("location")?;
                write_point2(w, &plus.position)?;
            }
        }
        w.end_object()?;
        Ok(())
    }

    fn write_reaction<W: Write>(
        &mut self,
        w: &mut JsonWriter<W>,
        location: &str,
        reaction: &Reaction,
        layout: &ReactionLayout,
        fragment_ids: &[Option<String>],
    ) -> SaveResult {
        w.start_object()?;
        w.key("type")?;
        w.string("reaction")?;

        w.key("components")?;
        w.start_array()?;
        for (i, component) in layout.components.iter().enumerate() {
            w.start_object()?;
            match component.kind {
                ComponentKind::Molecule => {
                    w.key("type")?;
                    w.string("molecule")?;
                    if let Some(Some(id)) = fragment_ids.get(i) {
                        w.key("$ref")?;
                        w.string(id)?;
                    }
                }
                ComponentKind::Plus => {
                    w.key("type")?;
                    w.string("plus")?;
                    if let Some(position) = component.coordinates.first() {
                        w.key("location")?;
                        write_point2(w, position)?;
                    }
                }
                ComponentKind::Arrow(kind) => {
                    w.key("type")?;
                    w.string("arrow")?;
                    match reaction.meta_objects.get(component.index) {
                        Some(MetaObject::Arrow(arrow)) => write_arrow_fields(w, arrow)?,
                        _ => {
                            w.key("mode")?;
                            w.string(kind.as_str())?;
                        }
                    }
                    w.key("connected")?;
                    w.bool(component.summary == SummaryLink::Connected)?;
                }
            }
            w.key("bbox")?;
            write_rect(w, &component.bbox)?;
            if let SummaryLink::Summary(id) = component.summary {
                if let Some(position) = layout.summary_position(id) {
                    w.key("summary")?;
                    write_index(w, position)?;
                }
            }
            w.end_object()?;
        }
        w.end_array()?;

        let summaries: Vec<_> = layout.summaries().collect();
        if !summaries.is_empty() {
            w.key("summaries")?;
            w.start_array()?;
            for (_, summary) in summaries {
                w.start_object()?;
                w.key("area")?;
                w.string(summary.area.as_str())?;
                w.key("bbox")?;
                write_rect(w, &summary.bbox)?;
                w.key("members")?;
                write_indices(w, &summary.indexes)?;
                if !summary.arrows_to.is_empty() {
                    w.key("arrowsTo")?;
                    write_indices(w, &summary.arrows_to)?;
                }
                w.end_object()?;
            }
            w.end_array()?;
        }

        let others = reaction
            .meta_objects
            .iter()
            .filter(|m| !matches!(m, MetaObject::Arrow(_) | MetaObject::Plus(_)))
            .chain(reaction.molecules.iter().flat_map(|m| m.molecule.meta_objects.iter()));
        self.write_meta_objects(w, location, others)?;

        w.end_object()?;
        Ok(())
    }
}

/// Checks that attachment ids run `1..=n` without gaps or repeats and that
/// every attachment atom is bonded to the R-site.
fn check_attachment_order(
    mol: &Molecule,
    rsite: usize,
    order: &[AttachmentOrder],
) -> Result<(), String> {
    let mut ids: Vec<u8> = order.iter().map(|entry| entry.id).collect();
    ids.sort_unstable();
    let expected: Vec<u8> = (1..=order.len()).map(|i| i as u8).collect();
    if ids != expected {
        return Err(format!(
            "attachment ids {:?} are not numbered 1..={}",
            ids,
            order.len()
        ));
    }
    let neighbors: BTreeSet<usize> = mol.neighbors(rsite).collect();
    if let Some(entry) = order.iter().find(|entry| !neighbors.contains(&entry.atom)) {
        return Err(format!(
            "attachment point {} uses atom {}, which is not bonded to the R-site",
            entry.id, entry.atom
        ));
    }
    Ok(())
}

fn validate_query_props(props: &QueryAtomProps) -> Result<(), String> {
    if let Some(custom) = &props.custom_query {
        if custom.trim().is_empty() {
            return Err("custom query expression is empty".to_string());
        }
    }
    if props.ring_size == Some(0) {
        return Err("ring size must be positive".to_string());
    }
    Ok(())
}

fn write_bonds<W: Write>(w: &mut JsonWriter<W>, mol: &Molecule) -> SaveResult {
    if mol.bond_count() == 0 {
        return Ok(());
    }
    w.key("bonds")?;
    w.start_array()?;
    for bond in mol.bonds() {
        w.start_object()?;
        w.key("type")?;
        w.uint(bond.order.code() as u32)?;
        w.key("atoms")?;
        w.start_array()?;
        write_index(w, bond.begin)?;
        write_index(w, bond.end)?;
        w.end_array()?;
        if bond.stereo.code() != 0 {
            w.key("stereo")?;
            w.uint(bond.stereo.code() as u32)?;
        }
        if let Some(token) = cip_token(bond.cip) {
            w.key("cip")?;
            w.string(token)?;
        }
        w.end_object()?;
    }
    w.end_array()?;
    Ok(())
}

fn write_sgroup<W: Write>(w: &mut JsonWriter<W>, group: &SGroup) -> SaveResult {
    w.start_object()?;
    w.key("type")?;
    w.string(group.kind.code())?;
    w.key("atoms")?;
    write_indices(w, &group.atoms)?;
    match &group.kind {
        SGroupKind::Data(data) => {
            w.key("fieldName")?;
            w.string(&data.name)?;
            w.key("fieldData")?;
            w.string(&data.data)?;
            if data.absolute {
                w.key("absolute")?;
                w.bool(true)?;
            }
            if data.attached {
                w.key("attached")?;
                w.bool(true)?;
            }
            if let Some(position) = &data.position {
                w.key("location")?;
                write_point2(w, position)?;
            }
        }
        SGroupKind::Superatom {
            label,
            expanded,
            attachment_points,
        } => {
            w.key("name")?;
            w.string(label)?;
            if *expanded {
                w.key("expanded")?;
                w.bool(true)?;
            }
            if !attachment_points.is_empty() {
                w.key("attachmentPoints")?;
                w.start_array()?;
                for point in attachment_points {
                    w.start_object()?;
                    w.key("attachmentAtom")?;
                    write_index(w, point.atom)?;
                    if let Some(leaving) = point.leaving_atom {
                        w.key("leavingAtom")?;
                        write_index(w, leaving)?;
                    }
                    w.key("attachmentId")?;
                    w.string(&point.id)?;
                    w.end_object()?;
                }
                w.end_array()?;
            }
        }
        SGroupKind::RepeatingUnit {
            subscript,
            connectivity,
        } => {
            w.key("subscript")?;
            w.string(subscript)?;
            w.key("connectivity")?;
            w.string(connectivity.as_str())?;
        }
        SGroupKind::Multiple {
            multiplier,
            parent_atoms,
        } => {
            w.key("mul")?;
            w.uint(*multiplier)?;
            w.key("parentAtoms")?;
            write_indices(w, parent_atoms)?;
        }
        SGroupKind::Generic => {}
    }
    w.end_object()?;
    Ok(())
}

fn write_arrow_fields<W: Write>(w: &mut JsonWriter<W>, arrow: &ReactionArrow) -> SaveResult {
    w.key("mode")?;
    w.string(arrow.kind.as_str())?;
    w.key("pos")?;
    w.start_array()?;
    write_point2(w, &arrow.begin)?;
    write_point2(w, &arrow.end)?;
    w.end_array()?;
    if arrow.kind.is_elliptical() {
        w.key("height")?;
        w.double(arrow.height)?;
    }
    Ok(())
}

fn write_index<W: Write>(w: &mut JsonWriter<W>, index: usize) -> SaveResult {
    w.uint64(index as u64)?;
    Ok(())
}

fn write_indices<W: Write>(w: &mut JsonWriter<W>, indices: &[usize]) -> SaveResult {
    w.start_array()?;
    for &index in indices {
        write_index(w, index)?;
    }
    w.end_array()?;
    Ok(())
}

fn write_point2<W: Write>(w: &mut JsonWriter<W>, p: &Point2<f64>) -> SaveResult {
    w.start_array()?;
    w.double(p.x)?;
    w.double(p.y)?;
    w.end_array()?;
    Ok(())
}

fn write_point3<W: Write>(w: &mut JsonWriter<W>, p: &Point3<f64>) -> SaveResult {
    w.start_array()?;
    w.double(p.x)?;
    w.double(p.y)?;
    w.double(p.z)?;
    w.end_array()?;
    Ok(())
}

fn write_rect<W: Write>(w: &mut JsonWriter<W>, rect: &Rect2) -> SaveResult {
    w.start_array()?;
    write_point2(w, &rect.min)?;
    write_point2(w, &rect.max)?;
    w.end_array()?;
    Ok(())
}
