use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Enum types shared by dogs and cats
        db.execute_unprepared(
            r#"
            DO $$ BEGIN
                CREATE TYPE shelter.animal_size AS ENUM ('small', 'medium', 'large');
            EXCEPTION
                WHEN duplicate_object THEN null;
            END $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            DO $$ BEGIN
                CREATE TYPE shelter.animal_status AS ENUM ('arrived', 'adopted', 'returned');
            EXCEPTION
                WHEN duplicate_object THEN null;
            END $$;
            "#,
        )
        .await?;

        let create_dogs_sql = "CREATE TABLE IF NOT EXISTS shelter.dogs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR NOT NULL,
            size shelter.animal_size NOT NULL,
            birth_date DATE,
            sex VARCHAR,
            neutered BOOLEAN NOT NULL DEFAULT false,
            admitted_date DATE NOT NULL,
            released_date DATE,
            status shelter.animal_status NOT NULL DEFAULT 'arrived',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )";
        db.execute_unprepared(create_dogs_sql).await?;

        let create_cats_sql = "CREATE TABLE IF NOT EXISTS shelter.cats (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR NOT NULL,
            size shelter.animal_size NOT NULL,
            birth_date DATE,
            sex VARCHAR,
            neutered BOOLEAN NOT NULL DEFAULT false,
            admitted_date DATE NOT NULL,
            released_date DATE,
            status shelter.animal_status NOT NULL DEFAULT 'arrived',
            indoor_only BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )";
        db.execute_unprepared(create_cats_sql).await?;

        let create_dog_history_sql = "CREATE TABLE IF NOT EXISTS shelter.dog_history (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            dog_id UUID NOT NULL,
            field_name VARCHAR NOT NULL,
            old_value VARCHAR,
            new_value VARCHAR,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT fk_dog_history_dog
                FOREIGN KEY (dog_id)
                REFERENCES shelter.dogs(id)
                ON DELETE CASCADE
        )";
        db.execute_unprepared(create_dog_history_sql).await?;

        // Statistics count by status on every broadcast
        db.execute_unprepared("CREATE INDEX IF NOT EXISTS dogs_status_idx ON shelter.dogs(status)")
            .await?;
        db.execute_unprepared("CREATE INDEX IF NOT EXISTS cats_status_idx ON shelter.cats(status)")
            .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS dog_history_dog_id_created_at_idx
            ON shelter.dog_history(dog_id, created_at)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS shelter.dog_history")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS shelter.cats")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS shelter.dogs")
            .await?;
        db.execute_unprepared("DROP TYPE IF EXISTS shelter.animal_status")
            .await?;
        db.execute_unprepared("DROP TYPE IF EXISTS shelter.animal_size")
            .await?;

        Ok(())
    }
}
