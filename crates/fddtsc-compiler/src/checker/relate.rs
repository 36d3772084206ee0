//! Assignability.
//!
//! Relations are three-valued: `Some(true)`, `Some(false)`, or `None` when
//! the answer depends on type parameters that are still free. Conditional
//! types only take their true branch on `Some(true)`.

use fddtsc_core::utils::parse_numeric_literal;

use super::Checker;
use super::types::{ElementKind, Signature, TupleElement, TypeId, TypeKind};

impl<'p> Checker<'p> {
    pub(crate) fn is_assignable(&self, source: TypeId, target: TypeId) -> Option<bool> {
        if source == target {
            return Some(true);
        }
        let key = (source, target);
        if let Some(&cached) = self.relations.borrow().get(&key) {
            return cached;
        }
        if !self.relating.borrow_mut().insert(key) {
            return Some(true);
        }
        let result = self.nested(None, || self.relate(source, target));
        self.relating.borrow_mut().remove(&key);
        self.relations.borrow_mut().insert(key, result);
        result
    }

    fn relate(&self, source: TypeId, target: TypeId) -> Option<bool> {
        let (s, t) = (self.kind(source), self.kind(target));
        if s == t {
            return Some(true);
        }
        match t {
            TypeKind::Any | TypeKind::Error | TypeKind::Unknown => return Some(true),
            _ => {}
        }
        match s {
            TypeKind::Any | TypeKind::Error => return Some(target != TypeId::NEVER),
            TypeKind::Never => return Some(true),
            _ => {}
        }

        if let TypeKind::Union(members) = &s {
            return all(members.iter().map(|&m| self.is_assignable(m, target)));
        }
        if let TypeKind::Intersection(members) = &t {
            return all(members.iter().map(|&m| self.is_assignable(source, m)));
        }
        if let TypeKind::Union(members) = &t {
            return any(members.iter().map(|&m| self.is_assignable(source, m)));
        }
        if let TypeKind::Intersection(members) = &s {
            let direct = any(members.iter().map(|&m| self.is_assignable(m, target)));
            if direct == Some(true) || !self.is_object_like(target) {
                return direct;
            }
            return self.structural(source, target);
        }

        if let TypeKind::Param(symbol) = s {
            return match self.param_constraint(symbol) {
                Some(constraint) if self.is_assignable(constraint, target) == Some(true) => Some(true),
                _ => None,
            };
        }
        if self.is_deferred_operand(source) || self.is_deferred_operand(target) {
            return None;
        }

        match (&s, &t) {
            (TypeKind::Null, _) | (TypeKind::Undefined, _) if !self.strict_null_checks => Some(true),
            (TypeKind::Undefined, TypeKind::Void) => Some(true),
            (
                TypeKind::StringLiteral(_) | TypeKind::TemplateLiteral { .. } | TypeKind::StringMapping { .. },
                TypeKind::String,
            ) => Some(true),
            (TypeKind::NumberLiteral(_), TypeKind::Number) => Some(true),
            (TypeKind::BigIntLiteral(_), TypeKind::BigInt) => Some(true),
            (TypeKind::StringLiteral(text), TypeKind::TemplateLiteral { texts, types }) => {
                let matched = self.match_template_literal(text, texts, types)?;
                Some(
                    matched
                        .iter()
                        .zip(types)
                        .all(|(part, &placeholder)| self.fits_placeholder(part, placeholder)),
                )
            }
            (TypeKind::StringLiteral(text), TypeKind::StringMapping { mapping, ty }) => {
                if mapping.apply(text) != *text {
                    return Some(false);
                }
                let literal = self.string_literal(text);
                self.is_assignable(literal, *ty)
            }
            (TypeKind::Tuple { elements: se, readonly: sr }, TypeKind::Tuple { elements: te, readonly: tr }) => {
                if *sr && !*tr {
                    return Some(false);
                }
                self.relate_tuples(se, te)
            }
            (TypeKind::Tuple { elements, readonly }, TypeKind::Interface { .. })
                if self.array_element_type(target).is_some() =>
            {
                if *readonly && !self.is_readonly_array(target) {
                    return Some(false);
                }
                let element = self.array_element_type(target)?;
                self.is_assignable(self.tuple_element_union(elements), element)
            }
            (
                TypeKind::Interface { symbol: a, args: sa },
                TypeKind::Interface { symbol: b, args: ta },
            ) if a == b && sa.len() == ta.len() => {
                let args = all(sa.iter().zip(ta).map(|(&x, &y)| self.is_assignable(x, y)));
                if args == Some(true) {
                    return args;
                }
                self.structural(source, target)
            }
            _ if target == TypeId::NON_PRIMITIVE => Some(self.is_object_like(source)),
            _ if self.is_object_like(target) => {
                if matches!(s, TypeKind::Null | TypeKind::Undefined | TypeKind::Void | TypeKind::NonPrimitive) {
                    return Some(false);
                }
                self.structural(source, target)
            }
            _ => Some(false),
        }
    }

    /// Member-by-member comparison against an object target.
    fn structural(&self, source: TypeId, target: TypeId) -> Option<bool> {
        let target_shape = self.resolve_shape(target)?;
        let apparent = self.apparent_type(source);
        let mut result = Some(true);
        for property in &target_shape.properties {
            match self.property_of_type(apparent, &property.name) {
                Some(found) => {
                    if found.optional && !property.optional {
                        return Some(false);
                    }
                    result = both(result, self.is_assignable(found.ty, property.ty));
                }
                None if property.optional => {}
                None => return Some(false),
            }
            if result == Some(false) {
                return result;
            }
        }

        let source_shape = self.resolve_shape(apparent);
        let signatures = |construct: bool| {
            source_shape
                .as_ref()
                .map(|s| {
                    if construct {
                        s.construct_signatures.clone()
                    } else {
                        s.call_signatures.clone()
                    }
                })
                .unwrap_or_default()
        };
        for (construct, wanted) in [
            (false, &target_shape.call_signatures),
            (true, &target_shape.construct_signatures),
        ] {
            let available = signatures(construct);
            for signature in wanted {
                let related = any(available.iter().map(|s| self.relate_signatures(s, signature)));
                result = both(result, related);
                if result == Some(false) {
                    return result;
                }
            }
        }

        for info in &target_shape.index_infos {
            if let Some(found) = self.index_info_of(apparent, info.key) {
                result = both(result, self.is_assignable(found.ty, info.ty));
                continue;
            }
            let Some(shape) = &source_shape else {
                return Some(false);
            };
            let implicit = matches!(self.kind(source), TypeKind::Object(_) | TypeKind::Anonymous { .. });
            if !implicit {
                return Some(false);
            }
            for property in &shape.properties {
                if info.key == TypeId::NUMBER && !property.numeric {
                    continue;
                }
                result = both(result, self.is_assignable(property.ty, info.ty));
            }
        }
        result
    }

    fn relate_signatures(&self, source: &Signature, target: &Signature) -> Option<bool> {
        let required = source.params.iter().filter(|p| !p.optional && !p.rest).count();
        let target_has_rest = target.params.iter().any(|p| p.rest);
        if required > target.params.len() && !target_has_rest {
            return Some(false);
        }
        let mut result = if target.return_type == TypeId::VOID {
            Some(true)
        } else {
            self.is_assignable(source.return_type, target.return_type)
        };
        for (s, t) in source.params.iter().zip(&target.params) {
            if s.rest || t.rest {
                break;
            }
            let param = any([self.is_assignable(t.ty, s.ty), self.is_assignable(s.ty, t.ty)].into_iter());
            result = both(result, param);
        }
        result
    }

    fn relate_tuples(
        &self,
        source: &[TupleElement],
        target: &[TupleElement],
    ) -> Option<bool> {
        let fixed = |e: &[TupleElement]| {
            e.iter()
                .all(|x| matches!(x.kind, ElementKind::Required | ElementKind::Optional))
        };
        if !fixed(source) || !fixed(target) {
            if target.iter().any(|e| e.kind == ElementKind::Rest) && fixed(source) {
                let mut result = Some(true);
                for (i, element) in source.iter().enumerate() {
                    let slot = target.get(i).filter(|t| t.kind != ElementKind::Rest);
                    let slot = slot.or_else(|| target.iter().find(|t| t.kind == ElementKind::Rest))?;
                    result = both(result, self.is_assignable(element.ty, slot.ty));
                }
                return result;
            }
            return None;
        }
        let min = |e: &[TupleElement]| {
            e.iter().filter(|x| x.kind == ElementKind::Required).count()
        };
        if source.len() > target.len() || min(source) < min(target) {
            return Some(false);
        }
        all(source
            .iter()
            .zip(target)
            .map(|(s, t)| self.is_assignable(s.ty, t.ty)))
    }

    /// Splits `text` along a template's fixed texts; one piece per placeholder.
    pub(crate) fn match_template_literal(
        &self,
        text: &str,
        texts: &[String],
        types: &[TypeId],
    ) -> Option<Vec<String>> {
        let (head, tail) = (texts.first()?, texts.last()?);
        if text.len() < head.len() + tail.len() || !text.starts_with(head.as_str()) || !text.ends_with(tail.as_str()) {
            return None;
        }
        let body = &text[head.len()..text.len() - tail.len()];
        let mut pieces = Vec::with_capacity(types.len());
        let mut pos = 0;
        for delimiter in &texts[1..texts.len() - 1] {
            if !delimiter.is_empty() {
                let found = body[pos..].find(delimiter.as_str())? + pos;
                pieces.push(body[pos..found].to_string());
                pos = found + delimiter.len();
            } else {
                let next = body[pos..].chars().next()?;
                let end = pos + next.len_utf8();
                pieces.push(body[pos..end].to_string());
                pos = end;
            }
        }
        pieces.push(body[pos..].to_string());
        Some(pieces)
    }

    /// Whether a matched piece of text inhabits a placeholder type.
    fn fits_placeholder(&self, text: &str, placeholder: TypeId) -> bool {
        match self.kind(placeholder) {
            TypeKind::Any | TypeKind::String => true,
            TypeKind::Intersection(members) => members.iter().all(|&m| self.fits_placeholder(text, m)),
            TypeKind::Number => is_valid_number_string(text),
            TypeKind::BigInt => is_valid_bigint_string(text),
            TypeKind::True => text == "true",
            TypeKind::False => text == "false",
            TypeKind::Null => text == "null",
            TypeKind::Undefined => text == "undefined",
            TypeKind::StringMapping { .. } | TypeKind::TemplateLiteral { .. } | TypeKind::StringLiteral(_) => {
                let literal = self.string_literal(text);
                self.is_assignable(literal, placeholder) == Some(true)
            }
            _ => false,
        }
    }
}

/// `+text` is a finite number.
pub(crate) fn is_valid_number_string(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    let (sign, body) = match trimmed.as_bytes()[0] {
        b'+' | b'-' => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let lower = body.to_ascii_lowercase();
    if ["0x", "0o", "0b"].iter().any(|p| lower.starts_with(p)) {
        return !sign && !body.contains('_') && parse_numeric_literal(body).is_some();
    }
    if body.starts_with(['+', '-']) {
        return false;
    }
    let decimal = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    decimal && body.parse::<f64>().is_ok_and(f64::is_finite)
}

/// `text` scans as a bigint literal once `n` is appended.
pub(crate) fn is_valid_bigint_string(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    if body.is_empty() {
        return false;
    }
    let lower = body.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return false;
    }
    radix != 10 || digits == "0" || !digits.starts_with('0')
}

fn both(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn all(results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut acc = Some(true);
    for r in results {
        acc = both(acc, r);
        if acc == Some(false) {
            break;
        }
    }
    acc
}

fn any(results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut acc = Some(false);
    for r in results {
        match r {
            Some(true) => return Some(true),
            None => acc = None,
            Some(false) => {}
        }
    }
    acc
}
