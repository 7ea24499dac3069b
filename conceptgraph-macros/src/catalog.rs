use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Token};

const CATEGORIES: [&str; 5] = ["mathematics", "programming", "logic", "science", "language"];

pub(crate) struct CatalogInput {
    entries: Vec<Entry>,
}

struct Entry {
    id: ConceptKey,
    _colon: Token![:],
    category: Ident,
    prerequisites: Vec<ConceptKey>,
}

/// A concept id, written as an identifier or, for ids like `algebra-basics`, as a string literal.
enum ConceptKey {
    Ident(Ident),
    Str(LitStr),
}

impl ConceptKey {
    fn value(&self) -> String {
        match self {
            ConceptKey::Ident(i) => i.to_string(),
            ConceptKey::Str(s) => s.value(),
        }
    }

    fn span(&self) -> Span {
        match self {
            ConceptKey::Ident(i) => i.span(),
            ConceptKey::Str(s) => s.span(),
        }
    }
}

impl Parse for ConceptKey {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(LitStr) {
            Ok(ConceptKey::Str(input.parse()?))
        } else if lookahead.peek(Ident) {
            Ok(ConceptKey::Ident(input.parse()?))
        } else {
            Err(lookahead.error())
        }
    }
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let id = input.parse()?;
        let _colon = input.parse()?;
        let category: Ident = input.parse()?;
        if !CATEGORIES.contains(&category.to_string().as_str()) {
            return Err(syn::Error::new(
                category.span(),
                format!(
                    "unknown category `{category}`, expected one of: {}",
                    CATEGORIES.join(", ")
                ),
            ));
        }

        let mut prerequisites = Vec::new();
        if input.peek(Token![<-]) {
            input.parse::<Token![<-]>()?;
            loop {
                prerequisites.push(input.parse()?);
                if input.parse::<Token![,]>().is_err() {
                    break;
                }
            }
        }

        Ok(Self {
            id,
            _colon,
            category,
            prerequisites,
        })
    }
}

impl Parse for CatalogInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut entries = Vec::new();
        while !input.is_empty() {
            entries.push(input.parse()?);
            if input.is_empty() {
                break;
            }
            input.parse::<Token![;]>()?;
        }
        Ok(Self { entries })
    }
}

enum DagViolation {
    SelfPrerequisite(String),
    Cycle(Vec<String>),
}

impl Display for DagViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DagViolation::SelfPrerequisite(id) => write!(f, "self-prerequisite: {id} <- {id}"),
            DagViolation::Cycle(ids) => write!(f, "cycle: {}", ids.join(" <- ")),
        }
    }
}

fn violations_to_error(violations: Vec<DagViolation>) -> syn::Error {
    let mut message = "Error: prerequisites should form a directed acyclic graph".to_owned();
    for v in violations {
        message.push_str(&format!("\n  - {v}"))
    }
    syn::Error::new(Span::call_site(), message)
}

/// Depth-first search from every entry; an edge back to a concept on the current path is a cycle.
fn find_cycles(graph: &[(String, Vec<String>)]) -> Vec<DagViolation> {
    fn visit<'a>(
        id: &'a str,
        edges: &HashMap<&'a str, Vec<&'a str>>,
        path: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
        violations: &mut Vec<DagViolation>,
    ) {
        path.push(id);
        for &next in edges.get(id).into_iter().flatten() {
            if next == id {
                violations.push(DagViolation::SelfPrerequisite(id.to_string()));
            } else if let Some(start) = path.iter().position(|p| *p == next) {
                let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(next.to_string());
                violations.push(DagViolation::Cycle(cycle));
            } else if !done.contains(next) {
                visit(next, edges, path, done, violations);
            }
        }
        path.pop();
        done.insert(id);
    }

    let edges: HashMap<&str, Vec<&str>> = graph
        .iter()
        .map(|(id, prerequisites)| {
            (
                id.as_str(),
                prerequisites.iter().map(String::as_str).collect(),
            )
        })
        .collect();

    let mut done = HashSet::new();
    let mut violations = Vec::new();
    for (id, _) in graph {
        if !done.contains(id.as_str()) {
            visit(id, &edges, &mut Vec::new(), &mut done, &mut violations);
        }
    }
    violations
}

impl CatalogInput {
    pub(crate) fn compile(&self) -> TokenStream {
        let mut errors: Vec<syn::Error> = Vec::new();

        let mut declared: HashSet<String> = HashSet::new();
        for entry in &self.entries {
            if !declared.insert(entry.id.value()) {
                errors.push(syn::Error::new(
                    entry.id.span(),
                    format!("duplicate concept `{}`", entry.id.value()),
                ));
            }
        }

        for entry in &self.entries {
            for prerequisite in &entry.prerequisites {
                if !declared.contains(&prerequisite.value()) {
                    errors.push(syn::Error::new(
                        prerequisite.span(),
                        format!(
                            "`{}` requires `{}`, which is not declared in this catalog",
                            entry.id.value(),
                            prerequisite.value()
                        ),
                    ));
                }
            }
        }

        let graph: Vec<(String, Vec<String>)> = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.id.value(),
                    e.prerequisites.iter().map(ConceptKey::value).collect(),
                )
            })
            .collect();
        let violations = find_cycles(&graph);
        if !violations.is_empty() {
            errors.push(violations_to_error(violations));
        }

        let concepts = self.entries.iter().map(|entry| {
            let id = entry.id.value();
            let category = entry.category.to_string();
            let variant = format_ident!(
                "{}{}",
                category[..1].to_uppercase(),
                &category[1..],
                span = entry.category.span()
            );
            let prerequisites = entry.prerequisites.iter().map(ConceptKey::value);

            if entry.prerequisites.is_empty() {
                quote!(conceptgraph::Concept::new(#id, conceptgraph::Category::#variant))
            } else {
                quote!(
                    conceptgraph::Concept::new(#id, conceptgraph::Category::#variant)
                        .with_prerequisites([#(#prerequisites),*])
                )
            }
        });

        let catalog = quote!(
            conceptgraph::Catalog::from_validated(::std::vec![#(#concepts),*])
        );

        match errors.into_iter().reduce(|mut all, e| {
            all.combine(e);
            all
        }) {
            Some(error) => {
                let error = error.into_compile_error();
                quote!({
                    #error;
                    #catalog
                })
            }
            None => catalog,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(tokens: TokenStream) -> CatalogInput {
        syn::parse2(tokens).unwrap()
    }

    fn graph(input: &CatalogInput) -> Vec<(String, Vec<String>)> {
        input
            .entries
            .iter()
            .map(|e| {
                (
                    e.id.value(),
                    e.prerequisites.iter().map(ConceptKey::value).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_parse_entries() {
        let input = parse(quote!(
            a: logic;
            "b-c": mathematics <- a;
            d: programming <- a, "b-c"
        ));

        assert_eq!(
            vec![
                ("a".to_string(), vec![]),
                ("b-c".to_string(), vec!["a".to_string()]),
                ("d".to_string(), vec!["a".to_string(), "b-c".to_string()]),
            ],
            graph(&input)
        );
    }

    #[test]
    fn test_unknown_category() {
        assert!(syn::parse2::<CatalogInput>(quote!(a: alchemy;)).is_err());
    }

    #[test]
    fn test_acyclic_has_no_violations() {
        let input = parse(quote!(a: logic; b: logic <- a; c: logic <- a, b;));
        assert!(find_cycles(&graph(&input)).is_empty());
    }

    #[test]
    fn test_cycles_are_found() {
        let input = parse(quote!(a: logic <- b; b: logic <- a; s: logic <- s;));
        let violations: Vec<String> = find_cycles(&graph(&input))
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            vec!["cycle: a <- b <- a", "self-prerequisite: s <- s"],
            violations
        );
    }

    #[test]
    fn test_compile_reports_errors() {
        let input = parse(quote!(a: logic <- ghost; a: logic;));
        let output = input.compile().to_string();
        assert!(output.contains("compile_error"));
        assert!(output.contains("ghost"));
        assert!(output.contains("duplicate concept"));
    }
}
