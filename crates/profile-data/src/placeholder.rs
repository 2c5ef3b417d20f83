//! Static placeholder candidates.
//!
//! Shown when the profiles endpoint cannot be reached or when no viewer id
//! is known, so the swipe screen always has something to present.

use crate::types::Candidate;

/// The fixed fallback set, in presentation order.
pub fn placeholder_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(1, "Alexey")
            .with_age(22)
            .with_city("Moscow")
            .with_university("Lomonosov Moscow State University")
            .with_interests(["IT", "Programming", "Startups"])
            .with_goals(["Study together", "Find a hackathon team"])
            .with_bio("Student into software development and startups. Looking for people to build projects with."),
        Candidate::new(2, "Maria")
            .with_age(21)
            .with_city("Saint Petersburg")
            .with_university("Saint Petersburg State University")
            .with_interests(["Design", "Photography", "Art"])
            .with_goals(["Activities together", "Friends with shared interests"])
            .with_bio("Designer who loves photography, art and creative projects."),
        Candidate::new(3, "Dmitry")
            .with_age(23)
            .with_city("Moscow")
            .with_university("Bauman Moscow State Technical University")
            .with_interests(["Startups", "IT", "Entrepreneurship"])
            .with_goals(["Startup", "Internships and jobs"])
            .with_bio("Founder looking for a team for an IT startup. Background in engineering and business."),
        Candidate::new(4, "Anna")
            .with_age(20)
            .with_city("Kazan")
            .with_university("Kazan Federal University")
            .with_interests(["Volunteering", "Sport", "Music"])
            .with_goals(["Friends with shared interests", "Activities together"])
            .with_bio("Active student, volunteer and athlete."),
        Candidate::new(5, "Elena")
            .with_age(24)
            .with_city("Novosibirsk")
            .with_university("Novosibirsk State University")
            .with_interests(["Science", "Research", "Education"])
            .with_goals(["Study together", "Grow my network"])
            .with_bio("PhD student doing research. Interested in new technology and sharing knowledge."),
        Candidate::new(6, "Ivan")
            .with_age(19)
            .with_city("Yekaterinburg")
            .with_university("Ural Federal University")
            .with_interests(["Sport", "Gym", "Running"])
            .with_goals(["Friends with shared interests", "Activities together"])
            .with_bio("Runner and gym regular looking for training partners."),
        Candidate::new(7, "Sofia")
            .with_age(22)
            .with_city("Moscow")
            .with_university("HSE University")
            .with_interests(["Finance", "Investing", "Entrepreneurship"])
            .with_goals(["Internships and jobs", "Startup"])
            .with_bio("Economics student interested in finance and investing."),
        Candidate::new(8, "Maxim")
            .with_age(25)
            .with_city("Saint Petersburg")
            .with_university("Peter the Great St. Petersburg Polytechnic University")
            .with_interests(["Programming", "IT", "Video games"])
            .with_goals(["Find a hackathon team", "Internships and jobs"])
            .with_bio("Developer building games and mobile apps. Looking for a hackathon team."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_placeholder_ids_are_unique() {
        let candidates = placeholder_candidates();
        let ids: HashSet<_> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), candidates.len());
    }
}
