//! Named step aliases
//!
//! An alias is a step name standing for a fixed sequence of steps. It is
//! applied as a program rewrite, so the interpreter never sees it.

use super::step::{Arg, Program, Step};
use crate::error::{GraphError, GraphResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    name: String,
    expansion: Vec<Step>,
}

impl Alias {
    pub fn new(name: impl Into<String>, expansion: Vec<Step>) -> GraphResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::InvalidTransformer("alias name is empty".to_string()).report());
        }
        if expansion.is_empty() {
            return Err(
                GraphError::InvalidTransformer(format!("alias {:?} has an empty expansion", name))
                    .report(),
            );
        }
        Ok(Alias { name, expansion })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expansion(&self) -> &[Step] {
        &self.expansion
    }

    /// The steps standing in for one call of this alias.
    ///
    /// Call-site arguments override the declared arguments of every expansion
    /// step position by position; declared arguments fill in the rest.
    pub fn expand(&self, call_args: &[Arg]) -> Vec<Step> {
        self.expansion
            .iter()
            .map(|step| {
                let len = step.args.len().max(call_args.len());
                let args = (0..len)
                    .filter_map(|i| call_args.get(i).or_else(|| step.args.get(i)).cloned())
                    .collect();
                Step::new(step.name.clone(), args)
            })
            .collect()
    }

    /// Replace every call of this alias in `program`
    pub fn rewrite(&self, program: Program) -> Program {
        if !program.iter().any(|step| step.name == self.name) {
            return program;
        }
        program
            .into_iter()
            .flat_map(|step| {
                if step.name == self.name {
                    self.expand(&step.args)
                } else {
                    vec![step]
                }
            })
            .collect()
    }
}

/// Inline already-known aliases into a new expansion
pub fn inline_aliases<'a>(expansion: Vec<Step>, known: impl IntoIterator<Item = &'a Alias>) -> Vec<Step> {
    known
        .into_iter()
        .fold(expansion, |steps, alias| alias.rewrite(steps))
}

fn hop(direction: &str, label: &str) -> Step {
    Step::new(direction, vec![Arg::from(label)])
}

/// Family-tree aliases over `parent` edges pointing from child to parent.
///
/// Returned in definition order; later entries use earlier ones.
pub fn kinship_aliases() -> Vec<(&'static str, Vec<Step>)> {
    vec![
        ("parents", vec![hop("out", "parent")]),
        ("children", vec![hop("in", "parent")]),
        ("grandparents", vec![hop("out", "parent"), hop("out", "parent")]),
        (
            "siblings",
            vec![
                Step::new("as", vec![Arg::from("me")]),
                hop("out", "parent"),
                hop("in", "parent"),
                Step::new("except", vec![Arg::from("me")]),
            ],
        ),
        (
            "cousins",
            vec![
                Step::named("parents"),
                Step::new("as", vec![Arg::from("folks")]),
                Step::named("parents"),
                Step::named("children"),
                Step::new("except", vec![Arg::from("folks")]),
                Step::named("children"),
                Step::named("unique"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(program: &[Step]) -> Vec<&str> {
        program.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_rejects_empty_definitions() {
        assert!(matches!(
            Alias::new("", vec![Step::named("out")]),
            Err(GraphError::InvalidTransformer(_))
        ));
        assert!(matches!(
            Alias::new("nothing", Vec::new()),
            Err(GraphError::InvalidTransformer(_))
        ));
    }

    #[test]
    fn test_rewrite_expands_every_call() {
        let alias = Alias::new("grandparents", vec![hop("out", "parent"), hop("out", "parent")]).unwrap();
        let program = vec![
            Step::new("vertex", vec![Arg::from("x")]),
            Step::named("grandparents"),
            Step::named("grandparents"),
        ];

        let rewritten = alias.rewrite(program);
        assert_eq!(names(&rewritten), vec!["vertex", "out", "out", "out", "out"]);
        assert_eq!(rewritten[1].args, vec![Arg::from("parent")]);
    }

    #[test]
    fn test_call_site_arguments_override_defaults() {
        let alias = Alias::new("parents", vec![hop("out", "parent")]).unwrap();

        let defaulted = alias.expand(&[]);
        assert_eq!(defaulted, vec![hop("out", "parent")]);

        let overridden = alias.expand(&[Arg::from("guardian"), Arg::Count(2)]);
        assert_eq!(overridden[0].args, vec![Arg::from("guardian"), Arg::Count(2)]);
    }

    #[test]
    fn test_inline_nested_aliases() {
        let parents = Alias::new("parents", vec![hop("out", "parent")]).unwrap();
        let children = Alias::new("children", vec![hop("in", "parent")]).unwrap();
        let expansion = vec![Step::named("parents"), Step::named("children")];

        let inlined = inline_aliases(expansion, [&parents, &children]);
        assert_eq!(inlined, vec![hop("out", "parent"), hop("in", "parent")]);
    }

    #[test]
    fn test_kinship_definition_order() {
        let defs = kinship_aliases();
        let order: Vec<&str> = defs.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["parents", "children", "grandparents", "siblings", "cousins"]);
    }
}
