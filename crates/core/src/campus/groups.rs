//! Random classroom group assignment.

use rand::seq::SliceRandom;
use regex_lite::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupsError {
    #[error("Group size must be at least 2")]
    SizeTooSmall,

    #[error("Not enough mentions for that group size ({mentions} mentioned, size {size})")]
    NotEnoughMembers { mentions: usize, size: usize },
}

/// Extract account ids from platform mention syntax (`<@123>` / `<@!123>`).
pub fn parse_mentions(text: &str) -> Vec<String> {
    let re = Regex::new(r"<@!?(\d+)>").expect("valid mention pattern");
    re.captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Shuffle the mentioned members and chunk them into groups of `size` (the
/// last group takes the remainder).
pub fn make_groups(members: &[String], size: usize) -> Result<Vec<Vec<String>>, GroupsError> {
    if size < 2 {
        return Err(GroupsError::SizeTooSmall);
    }
    if members.len() < size {
        return Err(GroupsError::NotEnoughMembers {
            mentions: members.len(),
            size,
        });
    }

    let mut shuffled = members.to_vec();
    shuffled.shuffle(&mut rand::rng());

    Ok(shuffled.chunks(size).map(|c| c.to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_mention_forms() {
        let ids = parse_mentions("take <@111> and <@!222>, not @333 or <@abc>");
        assert_eq!(ids, vec!["111".to_string(), "222".to_string()]);
    }

    #[test]
    fn groups_cover_all_members() {
        let members: Vec<String> = (1..=7).map(|i| i.to_string()).collect();
        let groups = make_groups(&members, 3).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[2].len(), 1);

        let mut all: Vec<String> = groups.into_iter().flatten().collect();
        all.sort();
        let mut expected = members.clone();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn too_few_members_rejected() {
        let members = vec!["1".to_string()];
        assert!(matches!(
            make_groups(&members, 2),
            Err(GroupsError::NotEnoughMembers { .. })
        ));
    }

    #[test]
    fn size_below_two_rejected() {
        let members: Vec<String> = (1..=4).map(|i| i.to_string()).collect();
        assert!(matches!(
            make_groups(&members, 1),
            Err(GroupsError::SizeTooSmall)
        ));
    }
}
